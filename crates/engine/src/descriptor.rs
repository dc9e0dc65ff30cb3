//! Feature and case descriptors
//!
//! Descriptors are plain configuration built by the caller before a run and
//! never mutated by the engine.
//!
//! ```
//! use sparkle_engine::{Case, Feature};
//!
//! let feature = Feature::new("arithmetic")
//!     .before_each(|node| {
//!         node.add_detail("Step", "reset calculator");
//!         Ok(())
//!     })
//!     .case(
//!         Case::new("add", |node, _args| {
//!             node.assert_equals(2, 1 + 1, "sum");
//!             Ok(())
//!         })
//!         .tag("smoke"),
//!     )
//!     .case(
//!         Case::new("double", |node, args| {
//!             let input = args[0].as_int().unwrap_or_default();
//!             node.assert_equals(args[1].clone(), input * 2, "double");
//!             Ok(())
//!         })
//!         .parameterize(|| vec![vec![1.into(), 2.into()], vec![3.into(), 6.into()]]),
//!     );
//!
//! assert_eq!(feature.cases().len(), 2);
//! ```

use sparkle_core::{Assertion, CaseResult, Value};
use std::collections::BTreeSet;
use std::fmt;

/// Lifecycle hook: receives the feature node (BeforeAll/AfterAll) or the
/// iteration node (BeforeEach/AfterEach).
pub type HookFn = dyn Fn(&mut Assertion<'_>) -> CaseResult + Send + Sync;

/// Case body: receives the iteration node and its arguments (empty when the
/// case is not parameterized).
pub type BodyFn = dyn Fn(&mut Assertion<'_>, &[Value]) -> CaseResult + Send + Sync;

/// Parameter generator: one argument tuple per iteration.
pub type ParamsFn = dyn Fn() -> Vec<Vec<Value>> + Send + Sync;

/// One test scenario.
pub struct Case {
    pub(crate) name: String,
    pub(crate) tags: BTreeSet<String>,
    pub(crate) ignore: bool,
    pub(crate) parameters: Option<Box<ParamsFn>>,
    pub(crate) body: Option<Box<BodyFn>>,
}

impl Case {
    /// Case with a body
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut Assertion<'_>, &[Value]) -> CaseResult + Send + Sync + 'static,
    {
        Case {
            name: name.into(),
            tags: BTreeSet::new(),
            ignore: false,
            parameters: None,
            body: Some(Box::new(body)),
        }
    }

    /// Case without a body yet; it is reported as ignored
    pub fn pending(name: impl Into<String>) -> Self {
        Case {
            name: name.into(),
            tags: BTreeSet::new(),
            ignore: false,
            parameters: None,
            body: None,
        }
    }

    /// Add one tag
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Add several tags
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Mark the case ignored
    pub fn ignore(mut self) -> Self {
        self.ignore = true;
        self
    }

    /// Run the body once per generated argument tuple
    pub fn parameterize<F>(mut self, generator: F) -> Self
    where
        F: Fn() -> Vec<Vec<Value>> + Send + Sync + 'static,
    {
        self.parameters = Some(Box::new(generator));
        self
    }

    /// Case name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Case tags
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Whether the case is marked ignored
    pub fn is_ignored(&self) -> bool {
        self.ignore
    }

    /// Whether the case has a body
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Whether the case has a parameter generator
    pub fn is_parameterized(&self) -> bool {
        self.parameters.is_some()
    }
}

impl fmt::Debug for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Case")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .field("ignore", &self.ignore)
            .field("parameterized", &self.parameters.is_some())
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// Requested tags for a run.
///
/// A case is selected when at least one requested tag is among its tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    tags: Vec<String>,
}

impl TagFilter {
    /// Build a filter from requested tags
    pub fn new<I, T>(tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        TagFilter {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether no tag was requested
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Whether any requested tag appears in the case's tags
    pub fn matches(&self, case: &Case) -> bool {
        self.tags.iter().any(|tag| case.tags.contains(tag))
    }
}

/// A group of cases sharing lifecycle hooks.
pub struct Feature {
    pub(crate) name: String,
    pub(crate) before_all: Option<Box<HookFn>>,
    pub(crate) after_all: Option<Box<HookFn>>,
    pub(crate) before_each: Option<Box<HookFn>>,
    pub(crate) after_each: Option<Box<HookFn>>,
    pub(crate) cases: Vec<Case>,
}

impl Feature {
    /// Feature without hooks or cases
    pub fn new(name: impl Into<String>) -> Self {
        Feature {
            name: name.into(),
            before_all: None,
            after_all: None,
            before_each: None,
            after_each: None,
            cases: Vec::new(),
        }
    }

    /// Hook run once on the feature node before any case
    pub fn before_all<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Assertion<'_>) -> CaseResult + Send + Sync + 'static,
    {
        self.before_all = Some(Box::new(hook));
        self
    }

    /// Hook run once on the feature node after every case
    pub fn after_all<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Assertion<'_>) -> CaseResult + Send + Sync + 'static,
    {
        self.after_all = Some(Box::new(hook));
        self
    }

    /// Hook run on each iteration node before the body
    pub fn before_each<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Assertion<'_>) -> CaseResult + Send + Sync + 'static,
    {
        self.before_each = Some(Box::new(hook));
        self
    }

    /// Hook run on each iteration node after the body
    pub fn after_each<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Assertion<'_>) -> CaseResult + Send + Sync + 'static,
    {
        self.after_each = Some(Box::new(hook));
        self
    }

    /// Append a case
    pub fn case(mut self, case: Case) -> Self {
        self.cases.push(case);
        self
    }

    /// Feature name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cases in declared order
    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    /// Look up a case by name
    pub fn find_case(&self, name: &str) -> Option<&Case> {
        self.cases.iter().find(|c| c.name == name)
    }
}

impl fmt::Debug for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feature")
            .field("name", &self.name)
            .field("before_all", &self.before_all.is_some())
            .field("after_all", &self.after_all.is_some())
            .field("before_each", &self.before_each.is_some())
            .field("after_each", &self.after_each.is_some())
            .field("cases", &self.cases)
            .finish()
    }
}
