use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("duplicate external key '{key}' in {type_name}: fields '{first}' and '{second}'")]
    DuplicateKey {
        type_name: &'static str,
        key: &'static str,
        first: &'static str,
        second: &'static str,
    },
}
