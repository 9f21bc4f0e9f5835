/// How the simplification cache treats a hash match whose recorded source is not structurally
/// equal to the tree being looked up.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Only reuse a cached result if its recorded source is structurally equal to the tree being
    /// simplified. A hash collision is treated as a miss.
    ///
    /// This is the default option.
    #[default]
    Strict,

    /// Reuse the first result recorded under the same hash, even if its source is a different
    /// tree.
    ///
    /// This is unsound when two different trees share a hash (see
    /// [`ExpressionHash`](crate::symbolic::hash::ExpressionHash)), in which case one tree is
    /// "simplified" into the result of the other.
    BestEffort,
}

/// Options that bound and tune the simplifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimplifyOptions {
    /// The maximum number of times a single grouping may be rewritten into a new candidate before
    /// the simplifier gives up with [`DidNotConverge`](crate::error::DidNotConverge).
    pub max_iterations: usize,

    /// The maximum nesting depth the simplifier will descend into before giving up with
    /// [`DidNotConverge`](crate::error::DidNotConverge).
    pub max_depth: usize,

    /// See [`CollisionPolicy`].
    pub collision_policy: CollisionPolicy,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self {
            max_iterations: 64,
            max_depth: 256,
            collision_policy: CollisionPolicy::default(),
        }
    }
}

impl SimplifyOptions {
    /// Wraps the given [`SimplifyOptions`] into a builder for further customization.
    pub fn into_builder(self) -> SimplifyOptionsBuilder {
        SimplifyOptionsBuilder(self)
    }
}

/// Helper struct to build a [`SimplifyOptions`] struct.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimplifyOptionsBuilder(SimplifyOptions);

impl SimplifyOptionsBuilder {
    /// Creates a new builder with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of rewrites per grouping. See
    /// [`SimplifyOptions::max_iterations`] for more information.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.0.max_iterations = max_iterations;
        self
    }

    /// Sets the maximum nesting depth. See [`SimplifyOptions::max_depth`] for more information.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.0.max_depth = max_depth;
        self
    }

    /// Sets the collision policy. See [`CollisionPolicy`] for more information.
    pub fn collision_policy(mut self, collision_policy: CollisionPolicy) -> Self {
        self.0.collision_policy = collision_policy;
        self
    }

    /// Builds the [`SimplifyOptions`] struct.
    pub fn build(self) -> SimplifyOptions {
        self.0
    }
}
