/// A parsed page: exactly one root node.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Node,
}

/// `Name "content"? { (prop | child)* }?`
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub content: Option<String>,
    pub props: Vec<Prop>,
    pub children: Vec<Node>,
    /// 1-based position of the node name.
    pub line: usize,
    pub col: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    pub key: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Number(f32),
    /// Straight-alpha RGBA bytes from `#rrggbb` or `#rrggbbaa`.
    Color([u8; 4]),
    Ident(String),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Ident(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f32> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<[u8; 4]> {
        match self {
            Value::Color(c) => Some(*c),
            _ => None,
        }
    }
}

impl Node {
    /// Last value given for `key`; later properties override earlier ones.
    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.iter().rev().find(|p| p.key == key).map(|p| &p.value)
    }

    pub fn str_prop(&self, key: &str) -> Option<&str> {
        self.prop(key).and_then(Value::as_str)
    }

    pub fn number_prop(&self, key: &str) -> Option<f32> {
        self.prop(key).and_then(Value::as_number)
    }

    pub fn color_prop(&self, key: &str) -> Option<[u8; 4]> {
        self.prop(key).and_then(Value::as_color)
    }

    /// First direct child called `name`.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Direct children called `name`, in source order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(props: Vec<Prop>) -> Node {
        Node { name: "N".into(), content: None, props, children: Vec::new(), line: 1, col: 1 }
    }

    #[test]
    fn later_prop_wins() {
        let n = node(vec![
            Prop { key: "ratio".into(), value: Value::Number(0.5) },
            Prop { key: "ratio".into(), value: Value::Number(0.8) },
        ]);
        assert_eq!(n.number_prop("ratio"), Some(0.8));
    }

    #[test]
    fn typed_lookups_reject_other_kinds() {
        let n = node(vec![Prop { key: "c".into(), value: Value::Color([1, 2, 3, 255]) }]);
        assert_eq!(n.color_prop("c"), Some([1, 2, 3, 255]));
        assert_eq!(n.str_prop("c"), None);
        assert_eq!(n.number_prop("missing"), None);
    }

    #[test]
    fn identifiers_read_as_strings() {
        assert_eq!(Value::Ident("ghost".into()).as_str(), Some("ghost"));
    }
}
