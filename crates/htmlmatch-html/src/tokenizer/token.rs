use std::fmt;
use std::mem;

use strum_macros::{Display, EnumDiscriminants};

/// A `name="value"` pair on a tag token.
///
/// The tree uses the same type, so the builder moves a tag's attribute list
/// into its element unchanged.
pub use htmlmatch_dom::Attribute;

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// What the tokenizer hands to the tree builder. A run of character tokens
/// arrives as one [`Token::Text`]. A start tag written as `<x/>` arrives as
/// [`Token::SelfClosingTag`]. End of input is not a token; it is the
/// [`super::TokenizeError::EndOfInput`] error.
#[derive(Debug, Clone, PartialEq, Eq, EnumDiscriminants)]
#[strum_discriminants(name(TokenKind), derive(Display, Hash))]
pub enum Token {
    /// `<!DOCTYPE name>`. Public and system identifiers are skipped.
    Doctype {
        /// Lowercased name; `None` when the declaration has none.
        name: Option<String>,
        /// Set when the declaration was malformed.
        force_quirks: bool,
    },

    /// `<name attr=value>`
    StartTag {
        /// Lowercased tag name.
        name: String,
        /// Attributes in source order, duplicates included.
        attributes: Vec<Attribute>,
    },

    /// `</name>`. Attributes on an end tag are a parse error but are kept.
    EndTag {
        /// Lowercased tag name.
        name: String,
        /// Attributes in source order.
        attributes: Vec<Attribute>,
    },

    /// `<name attr=value/>`
    SelfClosingTag {
        /// Lowercased tag name.
        name: String,
        /// Attributes in source order, duplicates included.
        attributes: Vec<Attribute>,
    },

    /// `<!--data-->`, or a bogus comment such as `<?xml ...>`.
    Comment {
        /// Text between the delimiters.
        data: String,
    },

    /// Character data with references decoded.
    Text {
        /// The characters.
        data: String,
    },
}

impl Token {
    /// An unnamed DOCTYPE with force-quirks off.
    #[must_use]
    pub const fn new_doctype() -> Self {
        Self::Doctype {
            name: None,
            force_quirks: false,
        }
    }

    /// A start tag with an empty name and no attributes.
    #[must_use]
    pub const fn new_start_tag() -> Self {
        Self::StartTag {
            name: String::new(),
            attributes: Vec::new(),
        }
    }

    /// An end tag with an empty name and no attributes.
    #[must_use]
    pub const fn new_end_tag() -> Self {
        Self::EndTag {
            name: String::new(),
            attributes: Vec::new(),
        }
    }

    /// A comment holding `data`.
    #[must_use]
    pub fn new_comment(data: &str) -> Self {
        Self::Comment {
            data: data.to_string(),
        }
    }

    /// The discriminant of this token.
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        TokenKind::from(self)
    }

    /// The tag name for tag tokens.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Self::StartTag { name, .. }
            | Self::EndTag { name, .. }
            | Self::SelfClosingTag { name, .. } => Some(name),
            _ => None,
        }
    }

    /// The attribute list for tag tokens; empty for everything else.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        match self {
            Self::StartTag { attributes, .. }
            | Self::EndTag { attributes, .. }
            | Self::SelfClosingTag { attributes, .. } => attributes,
            _ => &[],
        }
    }
}

// Builders used by the state machine while a token is under construction.
// Calling one on the wrong kind of token is a tokenizer bug and panics.
impl Token {
    /// Push `c` onto the DOCTYPE name, creating the name if missing.
    ///
    /// # Panics
    ///
    /// Panics if this is not a DOCTYPE token.
    pub fn append_to_doctype_name(&mut self, c: char) {
        match self {
            Self::Doctype { name, .. } => name.get_or_insert_with(String::new).push(c),
            _ => wrong_kind("append_to_doctype_name", self.kind()),
        }
    }

    /// Turn force-quirks on.
    ///
    /// # Panics
    ///
    /// Panics if this is not a DOCTYPE token.
    pub fn set_force_quirks(&mut self) {
        match self {
            Self::Doctype { force_quirks, .. } => *force_quirks = true,
            _ => wrong_kind("set_force_quirks", self.kind()),
        }
    }

    /// Push `c` onto the tag name.
    ///
    /// # Panics
    ///
    /// Panics if this is not a tag token.
    pub fn append_to_tag_name(&mut self, c: char) {
        match self {
            Self::StartTag { name, .. }
            | Self::EndTag { name, .. }
            | Self::SelfClosingTag { name, .. } => name.push(c),
            _ => wrong_kind("append_to_tag_name", self.kind()),
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    ///
    /// A start tag becomes a [`Token::SelfClosingTag`]. The flag means nothing
    /// on an end tag and is dropped there.
    ///
    /// # Panics
    ///
    /// Panics if this is not a tag token.
    pub fn set_self_closing(&mut self) {
        match self {
            Self::StartTag { name, attributes } => {
                *self = Self::SelfClosingTag {
                    name: mem::take(name),
                    attributes: mem::take(attributes),
                };
            }
            Self::EndTag { .. } | Self::SelfClosingTag { .. } => {}
            _ => wrong_kind("set_self_closing", self.kind()),
        }
    }

    /// Append `s` to the comment data.
    ///
    /// # Panics
    ///
    /// Panics if this is not a comment token.
    pub fn append_to_comment(&mut self, s: &str) {
        match self {
            Self::Comment { data } => data.push_str(s),
            _ => wrong_kind("append_to_comment", self.kind()),
        }
    }

    /// Add an attribute with an empty name and value; the following
    /// `append_to_current_attribute_*` calls fill it in.
    ///
    /// # Panics
    ///
    /// Panics if this is not a tag token.
    pub fn start_new_attribute(&mut self) {
        self.attributes_mut("start_new_attribute")
            .push(Attribute::new(String::new(), String::new()));
    }

    /// Push `c` onto the newest attribute's name.
    ///
    /// # Panics
    ///
    /// Panics if this is not a tag token.
    pub fn append_to_current_attribute_name(&mut self, c: char) {
        if let Some(attr) = self
            .attributes_mut("append_to_current_attribute_name")
            .last_mut()
        {
            attr.name.push(c);
        }
    }

    /// Append `s` to the newest attribute's value.
    ///
    /// # Panics
    ///
    /// Panics if this is not a tag token.
    pub fn append_to_current_attribute_value(&mut self, s: &str) {
        if let Some(attr) = self
            .attributes_mut("append_to_current_attribute_value")
            .last_mut()
        {
            attr.value.push_str(s);
        }
    }

    fn attributes_mut(&mut self, caller: &str) -> &mut Vec<Attribute> {
        let kind = self.kind();
        match self {
            Self::StartTag { attributes, .. }
            | Self::EndTag { attributes, .. }
            | Self::SelfClosingTag { attributes, .. } => attributes,
            _ => wrong_kind(caller, kind),
        }
    }
}

fn wrong_kind(caller: &str, kind: TokenKind) -> ! {
    panic!("{caller} called on a {kind} token")
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doctype { name, force_quirks } => {
                write!(f, "DOCTYPE")?;
                if let Some(name) = name {
                    write!(f, " {name}")?;
                }
                if *force_quirks {
                    write!(f, " (force-quirks)")?;
                }
                Ok(())
            }
            Self::StartTag { name, attributes } | Self::SelfClosingTag { name, attributes } => {
                write!(f, "<{name}")?;
                for attr in attributes {
                    write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                }
                if self.kind() == TokenKind::SelfClosingTag {
                    write!(f, " />")
                } else {
                    write!(f, ">")
                }
            }
            Self::EndTag { name, .. } => write!(f, "</{name}>"),
            Self::Comment { data } => write!(f, "<!--{data}-->"),
            Self::Text { data } => write!(f, "Text({data:?})"),
        }
    }
}
