//! # IR Optimizer
//!
//! Optimization passes that transform IR programs to reduce redundancy.
//!
//! ## Optimization Passes
//!
//! 1. **Remove redundant state**: Don't emit SetFillColor(black) if the fill is already black
//! 2. **Drop empty scopes**: Remove `SaveState` immediately followed by `RestoreState`

use super::ops::{GraphicsState, Op, Program};

impl Program {
    /// Apply all optimization passes.
    pub fn optimize(self) -> Self {
        let ops = self.ops;
        let ops = remove_redundant_state(ops);
        let ops = drop_empty_scopes(ops);
        Program { ops }
    }
}

/// Remove graphics state changes that don't change the current state.
///
/// Tracks a save/restore stack so a change after `RestoreState` is compared
/// against the restored state, not the one that was popped.
fn remove_redundant_state(ops: Vec<Op>) -> Vec<Op> {
    let mut result = Vec::with_capacity(ops.len());
    let mut state = GraphicsState::default();
    let mut stack: Vec<GraphicsState> = Vec::new();

    for op in ops {
        match &op {
            Op::SaveState => {
                stack.push(state.clone());
                result.push(op);
            }
            Op::RestoreState => {
                if let Some(saved) = stack.pop() {
                    state = saved;
                }
                result.push(op);
            }
            Op::SetStrokeColor(c) => {
                if *c != state.stroke_color {
                    state.stroke_color = *c;
                    result.push(op);
                }
            }
            Op::SetFillColor(c) => {
                if *c != state.fill_color {
                    state.fill_color = *c;
                    result.push(op);
                }
            }
            Op::SetLineWidth(w) => {
                if *w != state.line_width {
                    state.line_width = *w;
                    result.push(op);
                }
            }
            Op::SetLineCap(cap) => {
                if *cap != state.line_cap {
                    state.line_cap = *cap;
                    result.push(op);
                }
            }
            Op::SetDashPattern(pattern) => {
                if *pattern != state.dash_pattern {
                    state.dash_pattern = pattern.clone();
                    result.push(op);
                }
            }

            // Painting and transforms pass through unchanged
            _ => result.push(op),
        }
    }

    result
}

/// Remove `SaveState, RestoreState` pairs with nothing in between.
fn drop_empty_scopes(ops: Vec<Op>) -> Vec<Op> {
    let mut result: Vec<Op> = Vec::with_capacity(ops.len());
    for op in ops {
        if matches!(op, Op::RestoreState) && matches!(result.last(), Some(Op::SaveState)) {
            result.pop();
            continue;
        }
        result.push(op);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn test_remove_redundant_fill() {
        let ops = vec![
            Op::SetFillColor(Color::WHITE),
            Op::SetFillColor(Color::WHITE), // Redundant
            Op::FillRect { x: 0.0, y: 0.0, width: 1.0, height: 1.0 },
            Op::SetFillColor(Color::BLACK),
            Op::SetFillColor(Color::BLACK), // Redundant
        ];
        let result = remove_redundant_state(ops);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_defaults_are_redundant() {
        let ops = vec![
            Op::SetStrokeColor(Color::BLACK), // Redundant (default)
            Op::SetLineWidth(1.0),            // Redundant (default)
            Op::SetDashPattern(vec![]),       // Redundant (default)
            Op::SetDashPattern(vec![2.0]),
        ];
        let result = remove_redundant_state(ops);
        assert_eq!(result, vec![Op::SetDashPattern(vec![2.0])]);
    }

    #[test]
    fn test_restore_resets_tracking() {
        let ops = vec![
            Op::SaveState,
            Op::SetLineWidth(3.0),
            Op::RestoreState,
            Op::SetLineWidth(3.0), // Not redundant: restore went back to 1.0
        ];
        let result = remove_redundant_state(ops);
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_drop_empty_scopes() {
        let ops = vec![
            Op::SaveState,
            Op::SaveState,
            Op::RestoreState,
            Op::Translate { x: 1.0, y: 1.0 },
            Op::RestoreState,
        ];
        let result = drop_empty_scopes(ops);
        assert_eq!(
            result,
            vec![
                Op::SaveState,
                Op::Translate { x: 1.0, y: 1.0 },
                Op::RestoreState
            ]
        );
    }

    #[test]
    fn test_full_optimization() {
        let program: Program = vec![
            Op::SaveState,
            Op::SetLineWidth(1.0), // Redundant, leaves an empty scope
            Op::RestoreState,
            Op::SetFillColor(Color::WHITE),
            Op::FillRect { x: 0.0, y: 0.0, width: 2.0, height: 2.0 },
        ]
        .into_iter()
        .collect();

        let optimized = program.optimize();
        assert_eq!(optimized.len(), 2);
        assert_eq!(optimized.ops[0], Op::SetFillColor(Color::WHITE));
    }
}
