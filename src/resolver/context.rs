//! Per-call cycle-detection state

use crate::namespace::CanonicalPath;

/// The ordered set of canonical paths currently being resolved
///
/// One `LoadingContext` exists per top-level resolve call and is threaded
/// explicitly through every recursive step, never stored in thread-local or
/// global state, so isolation between concurrent calls is structural. The
/// chain doubles as the diagnostic trail for circular-reference errors.
#[derive(Debug, Default)]
pub struct LoadingContext {
    in_progress: Vec<CanonicalPath>,
}

impl LoadingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a path is already being resolved in this call
    pub fn contains(&self, path: &CanonicalPath) -> bool {
        self.in_progress.contains(path)
    }

    /// Mark a path as in progress
    pub fn push(&mut self, path: CanonicalPath) {
        self.in_progress.push(path);
    }

    /// Unmark the most recently pushed path
    ///
    /// Runs on every exit path of a resolution level, so a failed nested
    /// resolution never poisons a sibling.
    pub fn pop(&mut self) {
        self.in_progress.pop();
    }

    pub fn depth(&self) -> usize {
        self.in_progress.len()
    }

    /// The chain leading to (and including) the offending path, for error
    /// messages: `a -> b -> a`
    pub fn chain_with(&self, offending: &CanonicalPath) -> String {
        let mut parts: Vec<&str> = self.in_progress.iter().map(|p| p.as_str()).collect();
        parts.push(offending.as_str());
        parts.join(" -> ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::resolve_template_path;

    #[test]
    fn test_push_contains_pop() {
        let mut ctx = LoadingContext::new();
        let a = resolve_template_path("t", "a.yaml");

        assert!(!ctx.contains(&a));
        ctx.push(a.clone());
        assert!(ctx.contains(&a));
        assert_eq!(ctx.depth(), 1);
        ctx.pop();
        assert!(!ctx.contains(&a));
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_chain_formatting() {
        let mut ctx = LoadingContext::new();
        let a = resolve_template_path("t", "a.yaml");
        let b = resolve_template_path("t", "b.yaml");
        ctx.push(a.clone());
        ctx.push(b);

        assert_eq!(
            ctx.chain_with(&a),
            "t/templates/a.yaml -> t/templates/b.yaml -> t/templates/a.yaml"
        );
    }
}
