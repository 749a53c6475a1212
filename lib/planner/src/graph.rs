use crate::{Action, Effects, State};

/// Every state reachable with one legal action, paired with that action.
pub fn successors(state: &State) -> Vec<(Action, State)> {
    state
        .legal_actions()
        .into_iter()
        .map(|action| (action, action.apply_to(state)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Blocks, Preconditions};

    #[test]
    fn successors_are_distinct_and_legal() {
        let blocks = Blocks::new(["a", "b", "c"]);
        let a = blocks.get("a").unwrap();
        let b = blocks.get("b").unwrap();
        let c = blocks.get("c").unwrap();
        let state = State::from_towers(3, &[vec![a, b], vec![c]]).unwrap();

        let next = successors(&state);

        assert_eq!(next.len(), 2);
        for (action, successor) in &next {
            assert!(action.is_fulfilled(&state));
            assert_ne!(successor, &state);
            match action {
                Action::PickUp(block) | Action::Unstack(block, _) => assert_eq!(successor.held(), Some(*block)),
                other => panic!("unexpected {other} with an empty hand"),
            }
        }
    }
}
