//! Explicit type descriptions for configuration records.
//!
//! A configuration type lists its fields once, in declaration order, through
//! [`Configurable::describe`]. Each field carries an optional external-key tag
//! and, when it can be bound, typed accessors that are erased here into
//! string-level operations.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use super::value::{PropertyValue, ValueType};

/// A configuration record whose fields can be described for binding.
///
/// Usually implemented with [`configurable!`](crate::configurable):
///
/// ```
/// use propbind::configurable;
///
/// #[derive(Debug, Default)]
/// struct ServiceConfig {
///     timeout_ms: u64,
///     name: String,
///     scratch: Vec<u8>,
/// }
///
/// configurable!(ServiceConfig {
///     timeout_ms => "timeout",
///     name => "",
///     scratch,
/// });
/// ```
pub trait Configurable: Default + 'static {
    fn describe() -> TypeDescriptor<Self>;
}

/// Type-erased access to one field of `T`.
pub(crate) struct Accessor<T> {
    assign: Box<dyn Fn(&mut T, &str) -> Result<(), String> + Send + Sync>,
    render: Box<dyn Fn(&T) -> Option<String> + Send + Sync>,
    synthesize: fn(Uuid) -> Option<String>,
}

impl<T: 'static> Accessor<T> {
    fn new<V: PropertyValue + 'static>(get: fn(&T) -> &V, get_mut: fn(&mut T) -> &mut V) -> Self {
        Self {
            assign: Box::new(move |target: &mut T, raw: &str| {
                *get_mut(target) = V::parse_property(raw)?;
                Ok(())
            }),
            render: Box::new(move |target: &T| get(target).render()),
            synthesize: synthesize_rendered::<V>,
        }
    }
}

impl<T> Accessor<T> {
    pub(crate) fn assign(&self, target: &mut T, raw: &str) -> Result<(), String> {
        (self.assign)(target, raw)
    }

    pub(crate) fn render(&self, target: &T) -> Option<String> {
        (self.render)(target)
    }

    pub(crate) fn synthesize(&self, seed: Uuid) -> Option<String> {
        (self.synthesize)(seed)
    }
}

fn synthesize_rendered<V: PropertyValue>(seed: Uuid) -> Option<String> {
    V::synthesize(seed).render()
}

/// Declared type and accessors of a field that can be bound.
pub(crate) struct FieldBinding<T> {
    pub(crate) value_type: ValueType,
    pub(crate) accessor: Arc<Accessor<T>>,
}

/// One field of a configuration type as declared by its description.
pub struct FieldDescriptor<T> {
    name: &'static str,
    tag: Option<&'static str>,
    binding: Option<FieldBinding<T>>,
}

impl<T> FieldDescriptor<T> {
    /// The field's own name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The external-key tag: `None` when untagged, `Some("")` when tagged without a key.
    pub fn tag(&self) -> Option<&'static str> {
        self.tag
    }

    /// Declared value type, if the field was described with accessors.
    pub fn value_type(&self) -> Option<ValueType> {
        self.binding.as_ref().map(|b| b.value_type)
    }

    pub(crate) fn into_parts(self) -> (&'static str, Option<&'static str>, Option<FieldBinding<T>>) {
        (self.name, self.tag, self.binding)
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("value_type", &self.value_type())
            .finish()
    }
}

/// Ordered field list of a configuration type.
#[must_use = "descriptors do nothing until introspected"]
pub struct TypeDescriptor<T> {
    type_name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
}

impl<T: 'static> TypeDescriptor<T> {
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            fields: Vec::new(),
        }
    }

    /// Declares a field with typed accessors.
    ///
    /// `tag` follows annotation semantics: `None` leaves the field unbindable,
    /// `Some("")` binds it under its own name, `Some(key)` binds it under `key`.
    pub fn field<V: PropertyValue + 'static>(
        mut self,
        name: &'static str,
        tag: Option<&'static str>,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> Self {
        self.fields.push(FieldDescriptor {
            name,
            tag,
            binding: Some(FieldBinding {
                value_type: V::VALUE_TYPE,
                accessor: Arc::new(Accessor::new(get, get_mut)),
            }),
        });
        self
    }

    /// Declares a field bound under `key`.
    pub fn tagged<V: PropertyValue + 'static>(
        self,
        name: &'static str,
        key: &'static str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> Self {
        self.field(name, Some(key), get, get_mut)
    }

    /// Declares a field that binding never touches.
    pub fn untagged(mut self, name: &'static str) -> Self {
        self.fields.push(FieldDescriptor {
            name,
            tag: None,
            binding: None,
        });
        self
    }
}

impl<T> TypeDescriptor<T> {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    pub(crate) fn into_fields(self) -> Vec<FieldDescriptor<T>> {
        self.fields
    }
}

impl<T> fmt::Debug for TypeDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Implements [`Configurable`] from a field list in declaration order.
///
/// `field => "key"` binds under `key`, `field => ""` binds under the field's
/// own name, and a bare `field` is left untouched by binding.
#[macro_export]
macro_rules! configurable {
    ($ty:ident { $($field:ident $(=> $key:literal)?),* $(,)? }) => {
        impl $crate::Configurable for $ty {
            fn describe() -> $crate::TypeDescriptor<Self> {
                let descriptor = $crate::TypeDescriptor::<Self>::new(stringify!($ty));
                $(
                    let descriptor = $crate::__configurable_field!(descriptor, $field $(, $key)?);
                )*
                descriptor
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __configurable_field {
    ($descriptor:expr, $field:ident) => {
        $descriptor.untagged(stringify!($field))
    };
    ($descriptor:expr, $field:ident, $key:literal) => {
        $descriptor.field(
            stringify!($field),
            Some($key),
            |c| &c.$field,
            |c| &mut c.$field,
        )
    };
}
