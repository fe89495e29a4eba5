//! The extension macros.
//!
//! Each macro is a stateless unit struct implementing [`ExtensionMacro`]. The
//! harness looks one up by attribute name, hands it the annotated declaration
//! and the name to extend, and splices whatever extensions come back.

use copywith_foundation::{Error, Result, TypeExpr};
use copywith_syntax::{DeclGroup, ExtensionDecl};

use crate::access::normalize;
use crate::classify::{has_mutable_storage, stored_properties};
use crate::copy_with::generate_copy_with;
use crate::kind::DeclKind;
use crate::mutation::{MutationShape, generate_mutation};

/// A generator attached to a type declaration by attribute.
pub trait ExtensionMacro: Send + Sync {
    /// Attribute name without the `@`.
    fn name(&self) -> &'static str;

    /// Produces the extensions for `decl`, extended as `type_name`.
    ///
    /// An empty result means there is nothing to generate.
    ///
    /// # Errors
    ///
    /// Returns an expansion error when `decl` has the wrong kind or an
    /// unsupported property declaration. Nothing is generated in that case.
    fn expand(&self, decl: &DeclGroup, type_name: &str) -> Result<Vec<ExtensionDecl>>;
}

/// `@CopyWith`: a `copyWith` method with one optional parameter per stored
/// property.
#[derive(Clone, Copy, Debug, Default)]
pub struct CopyWith;

impl ExtensionMacro for CopyWith {
    fn name(&self) -> &'static str {
        "CopyWith"
    }

    fn expand(&self, decl: &DeclGroup, type_name: &str) -> Result<Vec<ExtensionDecl>> {
        let DeclKind::ValueType = DeclKind::of(decl) else {
            return Err(Error::not_value_type());
        };
        let properties = stored_properties(decl)?;
        let extension = generate_copy_with(
            &TypeExpr::path(type_name),
            &properties,
            normalize(&decl.modifiers),
        );
        Ok(non_empty(extension))
    }
}

/// `@MutableCopy`: the value-type `mutatedCopy` method, for structs only.
///
/// Emits `mutatedCopy`, not `mutableCopy`, so both attributes share one name.
#[derive(Clone, Copy, Debug, Default)]
pub struct MutableCopy;

impl ExtensionMacro for MutableCopy {
    fn name(&self) -> &'static str {
        "MutableCopy"
    }

    fn expand(&self, decl: &DeclGroup, type_name: &str) -> Result<Vec<ExtensionDecl>> {
        let DeclKind::ValueType = DeclKind::of(decl) else {
            return Err(Error::not_value_type());
        };
        concrete_mutation(decl, type_name, MutationShape::Value)
    }
}

/// `@MutatedCopy`: `mutatedCopy` on structs and protocols.
///
/// Protocols restricted to reference types get the reference shape, since a
/// class conformer cannot be copied by assignment.
#[derive(Clone, Copy, Debug, Default)]
pub struct MutatedCopy;

impl ExtensionMacro for MutatedCopy {
    fn name(&self) -> &'static str {
        "MutatedCopy"
    }

    fn expand(&self, decl: &DeclGroup, type_name: &str) -> Result<Vec<ExtensionDecl>> {
        match DeclKind::of(decl) {
            DeclKind::ValueType => concrete_mutation(decl, type_name, MutationShape::Value),
            DeclKind::Protocol { reference_capable } => {
                let shape = if reference_capable {
                    MutationShape::Reference
                } else {
                    MutationShape::Value
                };
                Ok(protocol_mutation(decl, type_name, shape))
            }
            DeclKind::ReferenceType | DeclKind::Other(_) => {
                Err(Error::not_value_type_or_protocol())
            }
        }
    }
}

/// `@Mutating`: the in-place `mutating` method on classes and `AnyObject`
/// protocols.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mutating;

impl ExtensionMacro for Mutating {
    fn name(&self) -> &'static str {
        "Mutating"
    }

    fn expand(&self, decl: &DeclGroup, type_name: &str) -> Result<Vec<ExtensionDecl>> {
        match DeclKind::of(decl) {
            DeclKind::ReferenceType => concrete_mutation(decl, type_name, MutationShape::Reference),
            DeclKind::Protocol {
                reference_capable: true,
            } => Ok(protocol_mutation(decl, type_name, MutationShape::Reference)),
            DeclKind::Protocol {
                reference_capable: false,
            } => Err(Error::not_reference_capable()),
            DeclKind::ValueType | DeclKind::Other(_) => {
                Err(Error::not_reference_type_or_protocol())
            }
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// A struct or class gets the method only if some stored property is a `var`.
fn concrete_mutation(
    decl: &DeclGroup,
    type_name: &str,
    shape: MutationShape,
) -> Result<Vec<ExtensionDecl>> {
    if !has_mutable_storage(decl)? {
        return Ok(Vec::new());
    }
    let ty = TypeExpr::path(type_name);
    Ok(vec![generate_mutation(
        shape,
        &ty,
        &ty,
        normalize(&decl.modifiers),
    )])
}

/// Protocol properties are requirements, so there is no storage to check.
fn protocol_mutation(decl: &DeclGroup, type_name: &str, shape: MutationShape) -> Vec<ExtensionDecl> {
    vec![generate_mutation(
        shape,
        &TypeExpr::path(type_name),
        &TypeExpr::self_type(),
        normalize(&decl.modifiers),
    )]
}

fn non_empty(extension: ExtensionDecl) -> Vec<ExtensionDecl> {
    if extension.is_empty() {
        Vec::new()
    } else {
        vec![extension]
    }
}
