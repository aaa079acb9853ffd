//! Ordered attribute storage for values without a typed field

/// Insertion-ordered name/value pairs with set semantics on the name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Replace the value in place, or append a new pair
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name.to_string(), value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.0.iter().position(|(n, _)| n == name)?;
        Some(self.0.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `name=value` strings sorted by name
    pub fn to_sorted_pairs(&self) -> Vec<String> {
        let mut pairs: Vec<&(String, String)> = self.0.iter().collect();
        pairs.sort();
        pairs
            .into_iter()
            .map(|(n, v)| format!("{}={}", n, v))
            .collect()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (n, v) in iter {
            attrs.set(&n.into(), v);
        }
        attrs
    }
}

/// Declares a record with a required `id`, typed optional attributes and a
/// catch-all bag, plus accessors keyed by the wire attribute name.
macro_rules! attribute_record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $field:ident => $attr:literal ),* $(,)?
        }
        $( children { $( $(#[$cmeta:meta])* $child:ident : $cty:ty ),* $(,)? } )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            pub id: String,
            $( pub $field: Option<String>, )*
            /// Attributes without a typed field, in document order
            pub extra: $crate::model::Attributes,
            $( $( $(#[$cmeta])* pub $child: $cty, )* )?
        }

        impl $name {
            /// Read an attribute by its wire name
            pub fn attribute(&self, name: &str) -> Option<&str> {
                match name {
                    "id" => Some(self.id.as_str()),
                    $( $attr => self.$field.as_deref(), )*
                    other => self.extra.get(other),
                }
            }

            /// Set an attribute by its wire name
            pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
                let value = value.into();
                match name {
                    "id" => self.id = value,
                    $( $attr => self.$field = Some(value), )*
                    other => self.extra.set(other, value),
                }
            }

            pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
                match name {
                    "id" => Some(std::mem::take(&mut self.id)),
                    $( $attr => self.$field.take(), )*
                    other => self.extra.remove(other),
                }
            }

            /// All attributes as wire pairs: `id`, typed fields, then extras
            pub fn attributes(&self) -> Vec<(String, String)> {
                let mut out = Vec::new();
                if !self.id.is_empty() {
                    out.push(("id".to_string(), self.id.clone()));
                }
                $(
                    if let Some(value) = &self.$field {
                        out.push(($attr.to_string(), value.clone()));
                    }
                )*
                out.extend(
                    self.extra
                        .iter()
                        .map(|(n, v)| (n.to_string(), v.to_string())),
                );
                out
            }
        }
    };
}

pub(crate) use attribute_record;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_in_place() {
        let mut attrs: Attributes = [("b", "1"), ("a", "2")].into_iter().collect();
        attrs.set("b", "3");
        assert_eq!(attrs.iter().collect::<Vec<_>>(), vec![("b", "3"), ("a", "2")]);
        assert_eq!(attrs.to_sorted_pairs(), vec!["a=2", "b=3"]);
    }
}
