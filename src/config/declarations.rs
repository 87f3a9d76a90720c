use serde::{
    Deserialize, Deserializer,
    de::{MapAccess, SeqAccess, Visitor},
};
use std::{fmt, marker::PhantomData};

/// Named declarations in the order they appear in the document.
///
/// Accepts either an object keyed by name or an array of objects that carry a `name` field.
/// Duplicate names survive deserialization so that resolution can reject them instead of one
/// silently replacing the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declarations<T>(Vec<(String, T)>);

impl<T> Declarations<T> {
    /// Creates an empty set of declarations.
    pub fn new() -> Self {
        Declarations(Vec::new())
    }

    /// Appends a declaration. An existing declaration with the same name is kept.
    pub fn push(&mut self, name: impl Into<String>, declaration: T) {
        self.0.push((name.into(), declaration));
    }

    /// True if nothing was declared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The number of declarations, duplicates included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over name and declaration pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.0.iter().map(|(name, decl)| (name.as_str(), decl))
    }
}

impl<T> Default for Declarations<T> {
    fn default() -> Self {
        Declarations::new()
    }
}

impl<N: Into<String>, T> FromIterator<(N, T)> for Declarations<T> {
    fn from_iter<I: IntoIterator<Item = (N, T)>>(iter: I) -> Self {
        Declarations(iter.into_iter().map(|(name, decl)| (name.into(), decl)).collect())
    }
}

#[derive(Deserialize)]
struct Named<T> {
    name: String,
    #[serde(flatten)]
    declaration: T,
}

struct DeclarationsVisitor<T>(PhantomData<T>);

impl<'de, T> Visitor<'de> for DeclarationsVisitor<T>
where
    T: Deserialize<'de>,
{
    type Value = Declarations<T>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of name to declaration or a list of named declarations")
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Declarations::new())
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut decls = Declarations::new();
        while let Some((name, decl)) = map.next_entry::<String, T>()? {
            decls.push(name, decl);
        }
        Ok(decls)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut decls = Declarations::new();
        while let Some(Named { name, declaration }) = seq.next_element::<Named<T>>()? {
            decls.push(name, declaration);
        }
        Ok(decls)
    }
}

impl<'de, T> Deserialize<'de> for Declarations<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DeclarationsVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    #[serde(default)]
    struct Port {
        port: Option<u16>,
    }

    #[test]
    fn map_form_keeps_duplicate_keys() {
        let decls: Declarations<Port> = serde_json::from_str(r#"{"a": {"port": 1}, "a": {"port": 2}}"#).unwrap();
        let names: Vec<&str> = decls.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "a"]);
    }

    #[test]
    fn list_form_takes_name_field() {
        let decls: Declarations<Port> = serde_json::from_str(r#"[{"name": "ftp", "port": 2121}, {"name": "ftps"}]"#).unwrap();
        let collected: Vec<(&str, &Port)> = decls.iter().collect();
        assert_eq!(collected, vec![("ftp", &Port { port: Some(2121) }), ("ftps", &Port { port: None })]);
    }

    #[test]
    fn null_is_empty() {
        let decls: Declarations<Port> = serde_json::from_str("null").unwrap();
        assert!(decls.is_empty());
    }
}
