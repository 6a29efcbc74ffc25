//! The fixed keyword grammar.
//!
//! Every keyword owns an ordered list of [`ArgSpec`]s, one per argument
//! position. A spec is either a single syntax [`Category`] or a choice
//! among several.

use std::fmt;

use declapi_foundation::HttpMethod;

/// A syntax category an argument can belong to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// A URL template starting with `/`, with `:name` placeholders.
    Url,
    /// Any present token.
    String,
    /// A map literal `{:key value ...}`.
    Map,
    /// The literal token `selfMappings`.
    SelfMappings,
    /// The literal token `asBody`.
    AsBody,
}

impl Category {
    /// Returns the category's name as it appears in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Url => "type/url",
            Self::String => "type/string",
            Self::Map => "type/map",
            Self::SelfMappings => "fn/selfMappings",
            Self::AsBody => "fn/asBody",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The specification for one argument position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgSpec {
    /// The argument must belong to this category.
    One(Category),
    /// The argument must belong to one of these categories, tried in order.
    OneOf(&'static [Category]),
}

impl fmt::Display for ArgSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One(category) => write!(f, "({category})"),
            Self::OneOf(categories) => {
                write!(f, "(one-of")?;
                for category in *categories {
                    write!(f, " {category}")?;
                }
                write!(f, ")")
            }
        }
    }
}

const URL: ArgSpec = ArgSpec::One(Category::Url);
const URL_MAPPINGS: ArgSpec = ArgSpec::OneOf(&[Category::Map, Category::SelfMappings]);
const BODY_MAPPINGS: ArgSpec = ArgSpec::OneOf(&[Category::Map, Category::AsBody]);
const KEY: ArgSpec = ArgSpec::One(Category::String);

const REST_QUERY: &[ArgSpec] = &[URL, URL_MAPPINGS];
const REST_COMMAND: &[ArgSpec] = &[URL, URL_MAPPINGS, BODY_MAPPINGS];
const LOCAL: &[ArgSpec] = &[KEY];

/// The operation keyword at the head of a declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    /// `Rest/get`
    RestGet,
    /// `Rest/post`
    RestPost,
    /// `Rest/delete`
    RestDelete,
    /// `Rest/put`
    RestPut,
    /// `Rest/patch`
    RestPatch,
    /// `Local/get-in`
    LocalGetIn,
    /// `Local/set-in`
    LocalSetIn,
}

impl Keyword {
    /// Every keyword, in table order.
    pub const ALL: [Self; 7] = [
        Self::RestGet,
        Self::RestPost,
        Self::RestDelete,
        Self::RestPut,
        Self::RestPatch,
        Self::LocalGetIn,
        Self::LocalSetIn,
    ];

    /// Looks up a keyword by its exact name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Returns the keyword as written in declarations.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RestGet => "Rest/get",
            Self::RestPost => "Rest/post",
            Self::RestDelete => "Rest/delete",
            Self::RestPut => "Rest/put",
            Self::RestPatch => "Rest/patch",
            Self::LocalGetIn => "Local/get-in",
            Self::LocalSetIn => "Local/set-in",
        }
    }

    /// Returns the argument grammar for this keyword.
    #[must_use]
    pub const fn grammar(self) -> &'static [ArgSpec] {
        match self {
            Self::RestGet => REST_QUERY,
            Self::RestPost | Self::RestDelete | Self::RestPut | Self::RestPatch => REST_COMMAND,
            Self::LocalGetIn | Self::LocalSetIn => LOCAL,
        }
    }

    /// Returns the HTTP method for REST keywords.
    #[must_use]
    pub const fn http_method(self) -> Option<HttpMethod> {
        match self {
            Self::RestGet => Some(HttpMethod::Get),
            Self::RestPost => Some(HttpMethod::Post),
            Self::RestDelete => Some(HttpMethod::Delete),
            Self::RestPut => Some(HttpMethod::Put),
            Self::RestPatch => Some(HttpMethod::Patch),
            Self::LocalGetIn | Self::LocalSetIn => None,
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
