//! Path specifications and their segments.

use std::fmt;
use std::hash::{Hash, Hasher};

use regex::Regex;

use crate::error::{Result, RouterError};

/// Splits a request or registration path into its non-empty segments.
///
/// Leading, trailing and repeated slashes produce no segments, so `""`,
/// `"/"` and `"//"` all yield nothing.
pub fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// A regular expression matched against one whole path segment.
///
/// Two patterns are the same tree edge when their sources are equal.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles a segment pattern.
    ///
    /// The expression is anchored on both ends, so `[0-9]+` accepts `"123"`
    /// but not `"123a"`. Anchors already present in `source` are harmless.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidPattern`] if the expression does not
    /// compile.
    ///
    /// # Example
    ///
    /// ```
    /// use edgework_router::Pattern;
    ///
    /// let pattern = Pattern::new("[0-9]{3}").unwrap();
    /// assert!(pattern.is_match("123"));
    /// assert!(!pattern.is_match("1234"));
    /// ```
    pub fn new(source: &str) -> Result<Self> {
        let invalid = |e: regex::Error| RouterError::InvalidPattern(e.to_string());
        let regex = match Regex::new(&format!("^(?:{source})$")) {
            Ok(regex) => regex,
            Err(err) => {
                // A trailing `(?x)` comment swallows the closing group; a
                // newline ends the comment.
                Regex::new(source).map_err(invalid)?;
                Regex::new(&format!("^(?:{source}\n)$")).map_err(|_| invalid(err))?
            }
        };

        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Returns the pattern source as registered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns whether `segment` matches the whole pattern.
    #[must_use]
    pub fn is_match(&self, segment: &str) -> bool {
        self.regex.is_match(segment)
    }
}

impl TryFrom<Regex> for Pattern {
    type Error = RouterError;

    fn try_from(regex: Regex) -> Result<Self> {
        Self::new(regex.as_str())
    }
}

impl TryFrom<&Regex> for Pattern {
    type Error = RouterError;

    fn try_from(regex: &Regex) -> Result<Self> {
        Self::new(regex.as_str())
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

impl Hash for Pattern {
    fn hash<S: Hasher>(&self, state: &mut S) {
        self.source.hash(state);
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.source)
    }
}

/// One component of a path specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Matched by exact string equality.
    Literal(String),
    /// Matches any segment and captures it under the given name.
    Param(String),
    /// Matches segments accepted by a regular expression.
    Pattern(Pattern),
}

impl Segment {
    /// Parses a single string piece: `:name` is a parameter, anything else a
    /// literal.
    #[must_use]
    pub fn parse(piece: &str) -> Self {
        piece.strip_prefix(':').map_or_else(
            || Self::Literal(piece.to_string()),
            |name| Self::Param(name.to_string()),
        )
    }

    /// Creates a literal segment, even if it starts with `:`.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// Creates a parameter segment.
    #[must_use]
    pub fn param(name: impl Into<String>) -> Self {
        Self::Param(name.into())
    }

    /// Compiles a regular-expression segment.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidPattern`] if the expression does not
    /// compile.
    pub fn pattern(source: &str) -> Result<Self> {
        Pattern::new(source).map(Self::Pattern)
    }
}

impl From<&str> for Segment {
    fn from(piece: &str) -> Self {
        Self::parse(piece)
    }
}

impl From<String> for Segment {
    fn from(piece: String) -> Self {
        Self::parse(&piece)
    }
}

impl From<Pattern> for Segment {
    fn from(pattern: Pattern) -> Self {
        Self::Pattern(pattern)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(s) => f.write_str(s),
            Self::Param(name) => write!(f, ":{name}"),
            Self::Pattern(p) => p.fmt(f),
        }
    }
}

/// An ordered list of segments describing where a route lives.
///
/// Built from a slash-delimited string (`"/users/:id"`), from an explicit
/// sequence of segments, which is the only way to put a regular expression
/// below the root, or from a bare [`Pattern`].
///
/// # Example
///
/// ```
/// use edgework_router::{PathSpec, Segment};
///
/// let spec = PathSpec::from("/users/:id/");
/// assert_eq!(spec.segments(), &[Segment::literal("users"), Segment::param("id")]);
///
/// let spec = PathSpec::from(vec![
///     Segment::from("files"),
///     Segment::pattern("[0-9]+").unwrap(),
/// ]);
/// assert_eq!(spec.to_string(), "/files/([0-9]+)");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PathSpec {
    segments: Vec<Segment>,
}

impl PathSpec {
    /// The empty specification, naming the root.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Parses a slash-delimited path.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        Self {
            segments: split(path).map(Segment::parse).collect(),
        }
    }

    /// Builds a specification from explicit segments.
    ///
    /// Literal pieces containing `/` are split and parsed like a path string;
    /// empty literals are dropped.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Segment>,
    {
        let mut out = Vec::new();
        for segment in segments {
            match segment.into() {
                Segment::Literal(s) if s.contains('/') => {
                    out.extend(split(&s).map(Segment::parse));
                }
                Segment::Literal(s) if s.is_empty() => {}
                other => out.push(other),
            }
        }
        Self { segments: out }
    }

    /// Returns the segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Consumes the specification, returning its segments.
    #[must_use]
    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns whether this specification names the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the declared parameter names in path order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Returns a new specification with `self` in front of `rest`.
    #[must_use]
    pub fn join(&self, rest: &Self) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(rest.segments.iter().cloned());
        Self { segments }
    }
}

impl From<&str> for PathSpec {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl From<String> for PathSpec {
    fn from(path: String) -> Self {
        Self::parse(&path)
    }
}

impl From<&String> for PathSpec {
    fn from(path: &String) -> Self {
        Self::parse(path)
    }
}

impl From<Pattern> for PathSpec {
    fn from(pattern: Pattern) -> Self {
        Self {
            segments: vec![Segment::Pattern(pattern)],
        }
    }
}

impl From<Vec<Segment>> for PathSpec {
    fn from(segments: Vec<Segment>) -> Self {
        Self::from_segments(segments)
    }
}

impl<const N: usize> From<[Segment; N]> for PathSpec {
    fn from(segments: [Segment; N]) -> Self {
        Self::from_segments(segments)
    }
}

impl From<&PathSpec> for PathSpec {
    fn from(spec: &PathSpec) -> Self {
        spec.clone()
    }
}

impl FromIterator<Segment> for PathSpec {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self::from_segments(iter)
    }
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}
