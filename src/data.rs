pub mod student;

/// One column of a record schema: its wire name and the constraints the store upholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub unique: bool,
}

impl FieldSpec {
    pub const fn new(name: &'static str, required: bool, unique: bool) -> Self {
        Self {
            name,
            required,
            unique,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub fields: &'static [FieldSpec],
}

/// Anything that can be checked against a [`Schema`] by field name.
pub trait Document {
    fn field(&self, name: &str) -> Option<&str>;
}

impl Schema {
    /// Required fields that are absent or empty, in schema order.
    pub fn missing_fields(&self, document: &impl Document) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|spec| spec.required)
            .filter(|spec| document.field(spec.name).is_none_or(str::is_empty))
            .map(|spec| spec.name)
            .collect()
    }

    pub fn unique_fields(&self) -> impl Iterator<Item = &'static str> {
        self.fields
            .iter()
            .filter(|spec| spec.unique)
            .map(|spec| spec.name)
    }
}
