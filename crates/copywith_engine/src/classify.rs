//! Stored-property classification.
//!
//! Walks the members of a declaration in source order and keeps the ones that
//! occupy storage in an instance and can be passed to the member-wise
//! initializer. Order matters: it becomes the parameter order of every
//! generated function and the argument order of the reconstruction call.

use copywith_foundation::{Error, Result, TypeExpr};
use copywith_syntax::DeclGroup;
use copywith_syntax::ast::{BindingSpecifier, Pattern, PatternBinding, VariableDecl};

use crate::infer::resolve_type;

/// A stored instance property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredProperty {
    /// Property name.
    pub name: String,
    /// Declared or inferred type; `None` when neither is available.
    pub ty: Option<TypeExpr>,
    /// `let` or `var`.
    pub mutability: BindingSpecifier,
}

impl StoredProperty {
    /// Returns true if the type is known to be optional.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.ty.as_ref().is_some_and(TypeExpr::is_optional)
    }

    /// Returns true for `var` properties.
    #[must_use]
    pub fn is_mutable(&self) -> bool {
        self.mutability == BindingSpecifier::Var
    }
}

/// Returns the stored instance properties of `decl` in source order.
///
/// # Errors
///
/// Returns [`Error::multiple_bindings`] if any property declaration binds
/// more than one name or destructures a tuple.
pub fn stored_properties(decl: &DeclGroup) -> Result<Vec<StoredProperty>> {
    let mut properties = Vec::new();
    for variable in decl.variables() {
        if let Some(property) = classify_variable(variable)? {
            properties.push(property);
        }
    }
    Ok(properties)
}

/// Returns true if any stored property is a `var`.
///
/// # Errors
///
/// Propagates classification failures from [`stored_properties`].
pub fn has_mutable_storage(decl: &DeclGroup) -> Result<bool> {
    Ok(stored_properties(decl)?
        .iter()
        .any(StoredProperty::is_mutable))
}

fn classify_variable(variable: &VariableDecl) -> Result<Option<StoredProperty>> {
    let [binding] = variable.bindings.as_slice() else {
        return Err(Error::multiple_bindings());
    };
    let name = match &binding.pattern {
        Pattern::Tuple(_) => return Err(Error::multiple_bindings()),
        Pattern::Wildcard => return Ok(None),
        Pattern::Identifier(name) => name,
    };

    if variable.has_modifier("static") || variable.has_modifier("class") {
        return Ok(None);
    }
    if !is_stored(variable.specifier, binding) {
        return Ok(None);
    }

    Ok(Some(StoredProperty {
        name: name.clone(),
        ty: resolve_type(binding),
        mutability: variable.specifier,
    }))
}

/// A `let` with an initializer cannot be passed to the member-wise
/// initializer, and any accessor other than an observer makes it computed.
fn is_stored(specifier: BindingSpecifier, binding: &PatternBinding) -> bool {
    if specifier == BindingSpecifier::Let && binding.initializer.is_some() {
        return false;
    }
    binding
        .accessors
        .as_ref()
        .is_none_or(|accessors| accessors.is_observers_only())
}
