use std::collections::{BTreeSet, HashMap};
use super::{BinaryGrouping, Operand};

impl Operand {
    /// Returns the names of the variables in the operand, sorted and without duplicates.
    pub fn variables(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        let mut stack = vec![self];

        while let Some(operand) = stack.pop() {
            match operand {
                Operand::Variable(name) => {
                    names.insert(name.to_string());
                },
                Operand::Grouping(grouping) => match &**grouping {
                    BinaryGrouping::Binary { left, right, .. } => {
                        stack.push(right);
                        stack.push(left);
                    },
                    BinaryGrouping::Degenerate(inner) => stack.push(inner),
                },
                Operand::Blank | Operand::Integer(_) | Operand::Real(_) => {},
            }
        }

        names.into_iter().collect()
    }

    /// Returns a copy of the operand with every variable named in `values` replaced by its value.
    ///
    /// Subtrees that contain no replaced variable are shared with the original operand.
    pub fn substitute(&self, values: &HashMap<String, Operand>) -> Operand {
        // each node is visited twice: once to queue its children, once to rebuild it from them
        let mut tasks = vec![(self, false)];
        let mut results: Vec<(Operand, bool)> = Vec::new();

        while let Some((operand, children_done)) = tasks.pop() {
            let Operand::Grouping(grouping) = operand else {
                let replaced = match operand {
                    Operand::Variable(name) => values.get(&**name).cloned(),
                    _ => None,
                };
                results.push(match replaced {
                    Some(value) => (value, true),
                    None => (operand.clone(), false),
                });
                continue;
            };

            if !children_done {
                tasks.push((operand, true));
                match &**grouping {
                    BinaryGrouping::Binary { left, right, .. } => {
                        tasks.push((right, false));
                        tasks.push((left, false));
                    },
                    BinaryGrouping::Degenerate(inner) => tasks.push((inner, false)),
                }
                continue;
            }

            let rebuilt = match &**grouping {
                BinaryGrouping::Binary { op, .. } => {
                    let (Some((right, right_changed)), Some((left, left_changed))) = (results.pop(), results.pop()) else {
                        continue;
                    };
                    if left_changed || right_changed {
                        (Operand::binary(*op, left, right), true)
                    } else {
                        (operand.clone(), false)
                    }
                },
                BinaryGrouping::Degenerate(_) => {
                    let Some((inner, changed)) = results.pop() else {
                        continue;
                    };
                    if changed {
                        (Operand::degenerate(inner), true)
                    } else {
                        (operand.clone(), false)
                    }
                },
            };
            results.push(rebuilt);
        }

        results.pop().map_or_else(|| self.clone(), |(result, _)| result)
    }
}
