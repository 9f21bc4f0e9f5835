/// A type that collects the steps of an algorithm.
///
/// Implemented for `()`, which discards every step, and for [`Vec`], which keeps them in the
/// order they were taken. The simplifier accepts `&mut dyn StepCollector<Step>`, so callers that
/// do not care about the steps pay nothing for them.
pub trait StepCollector<S> {
    /// Adds a step to the collector.
    fn push(&mut self, step: S);
}

impl<S> StepCollector<S> for () {
    #[inline]
    fn push(&mut self, _: S) {}
}

impl<S> StepCollector<S> for Vec<S> {
    #[inline]
    fn push(&mut self, step: S) {
        self.push(step);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn collect(collector: &mut dyn StepCollector<u8>) {
        collector.push(1);
        collector.push(2);
    }

    #[test]
    fn vec_keeps_order() {
        let mut steps = Vec::new();
        collect(&mut steps);
        assert_eq!(steps, vec![1, 2]);
        collect(&mut ());
    }
}
