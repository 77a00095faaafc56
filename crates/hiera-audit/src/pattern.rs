//! hierarchy template compiler
//!
//! A hierarchy template such as `%{environment}/nodes/%{fqdn}` describes one level of the hierarchy. We compile
//! it into a [regex::Regex] that classifies file paths relative to the hierarchy root:
//!
//! | template                   | regex                                 |
//! |----------------------------|---------------------------------------|
//! | `common`                   | `common\.yaml$`                       |
//! | `%{environment}/role`      | `[\w.]*/role\.yaml$`                  |
//! | `nodes/%{fqdn}.yaml`       | `nodes/[\w.]*\.yaml$`                 |
//!
//! Only the end of the path is anchored. `common` therefore also matches `prod/common.yaml`, which means a file can
//! be classified under more than one level. That is intended: precedence is decided by [MatcherSet::rank_of].
use crate::config::Substitution;
use crate::error::{Error, Result};
use regex::Regex;

/// Regex fragment a `%{placeholder}` expands to
pub const PLACEHOLDER_PATTERN: &str = r"[\w.]*";

/// Compiles template syntax into regex syntax
///
/// Literal text is escaped, placeholders expand to [PLACEHOLDER_PATTERN] and the result is anchored to a path ending
/// in `.{extension}`. A template that already ends in `.{extension}` is not extended twice.
pub fn template_to_regex(template: &str, extension: &str) -> Result<String> {
    let suffix = format!(".{extension}");
    let body = template.strip_suffix(&suffix).unwrap_or(template);

    let mut pattern = String::with_capacity(body.len() * 2);
    let mut rest = body;

    while let Some(start) = rest.find("%{") {
        pattern.push_str(&regex::escape(&rest[..start]));

        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find('}') else {
            return Err(Error::compilation(template, "unterminated placeholder"));
        };

        let identifier = &after_open[..end];
        validate_identifier(template, identifier)?;

        pattern.push_str(PLACEHOLDER_PATTERN);
        rest = &after_open[end + 1..];
    }

    pattern.push_str(&regex::escape(rest));
    pattern.push_str(&regex::escape(&suffix));
    pattern.push('$');

    Ok(pattern)
}

fn validate_identifier(template: &str, identifier: &str) -> Result<()> {
    if identifier.is_empty() {
        return Err(Error::compilation(template, "empty placeholder"));
    }

    if identifier.contains("%{") {
        return Err(Error::compilation(template, "nested placeholder"));
    }

    if let Some(c) = identifier
        .chars()
        .find(|c| !(c.is_alphanumeric() || matches!(c, '_' | ':' | '.')))
    {
        return Err(Error::compilation(
            template,
            format!("invalid character {c:?} in placeholder {identifier:?}"),
        ));
    }

    Ok(())
}

/// One compiled hierarchy level
#[derive(Debug, Clone)]
pub struct Matcher {
    /// Position in the hierarchy, 0 is the most specific level
    pub rank: usize,
    /// Template as written in the hierarchy definition
    pub template: String,
    pub regex: Regex,
}

impl Matcher {
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Ordered list of [Matcher]s, `matchers[i]` derives from `templates[i]`
#[derive(Debug, Clone, Default)]
pub struct MatcherSet {
    matchers: Vec<Matcher>,
}

impl MatcherSet {
    /// Compile every template of a hierarchy in order
    ///
    /// `substitutions` are applied (in order) to each template before placeholders are expanded.
    pub fn compile<S: AsRef<str>>(
        templates: &[S],
        extension: &str,
        substitutions: &[Substitution],
    ) -> Result<Self> {
        let mut matchers = Vec::with_capacity(templates.len());

        for (rank, template) in templates.iter().enumerate() {
            let template = template.as_ref();
            let rewritten = substitutions
                .iter()
                .fold(template.to_owned(), |acc, substitution| {
                    substitution.apply(&acc)
                });

            // report the template as written, not the rewritten one
            let pattern = template_to_regex(&rewritten, extension).map_err(|e| match e {
                Error::Compilation { reason, .. } => Error::compilation(template, reason),
                other => other,
            })?;
            let regex =
                Regex::new(&pattern).map_err(|e| Error::compilation(template, e.to_string()))?;

            tracing::debug!(rank, template, %pattern, "compiled hierarchy level");
            matchers.push(Matcher {
                rank,
                template: template.to_owned(),
                regex,
            });
        }

        Ok(Self { matchers })
    }

    /// Precedence of a path: rank of the first matcher that matches it, or [MatcherSet::len] if none does
    pub fn rank_of(&self, path: &str) -> usize {
        self.matchers
            .iter()
            .find(|matcher| matcher.is_match(path))
            .map(|matcher| matcher.rank)
            .unwrap_or(self.matchers.len())
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Matcher> {
        self.matchers.iter()
    }

    pub fn get(&self, rank: usize) -> Option<&Matcher> {
        self.matchers.get(rank)
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}
