use pathfinding::directed::bfs::bfs;
use planner::eval::{Heuristic, HeuristicKind};
use planner::strategy::{AStar, Constructive, GreedyBestFirst, SearchOutcome, SearchStrategy};
use planner::{Block, Blocks, Fact, Goal, Preconditions, Problem, Solution, State, StopSignal, Support};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct World {
    blocks: Blocks,
    state: State,
    goal: Goal,
}

impl World {
    fn problem(&self) -> Problem {
        Problem::new(self.blocks.clone(), self.state.clone(), self.goal.clone()).unwrap()
    }
}

// Blocks sharing a tower number are stacked in block order
fn towers_of(blocks: &Blocks, assignment: &[usize]) -> Vec<Vec<Block>> {
    let mut towers = vec![Vec::new(); assignment.len()];
    for (block, tower) in blocks.iter().zip(assignment) {
        towers[*tower].push(block);
    }
    towers.retain(|tower| !tower.is_empty());
    towers
}

fn world(max_blocks: usize) -> impl Strategy<Value = World> {
    (1..=max_blocks)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(0..n, n),
                prop::collection::vec(0..n, n),
                prop::collection::vec(any::<bool>(), n),
                any::<bool>(),
            )
        })
        .prop_map(|(initial, target, keep, hold)| {
            let n = initial.len();
            let blocks = Blocks::new((0..n).map(|i| format!("b{i}")));

            let mut state = State::from_towers(n, &towers_of(&blocks, &initial)).unwrap();
            if hold {
                if let Some(action) = state.legal_actions().last() {
                    state = state.apply(*action).unwrap();
                }
            }

            let target = State::from_towers(n, &towers_of(&blocks, &target)).unwrap();
            let facts = blocks
                .iter()
                .zip(keep)
                .filter(|(_, keep)| *keep)
                .map(|(block, _)| match target.support(block) {
                    Some(Support::On(below)) => Fact::On(block, below),
                    _ => Fact::OnTable(block),
                });
            let goal = Goal::new(n, facts).unwrap();

            World { blocks, state, goal }
        })
}

fn assert_consistent(state: &State) {
    let supports: Vec<Support> = state.blocks().map(|b| state.support(b).unwrap()).collect();
    let held: Vec<Block> = state.blocks().filter(|b| supports[b.index()] == Support::Held).collect();

    assert!(held.len() <= 1);
    assert_eq!(state.held(), held.first().copied());
    assert_eq!(state.is_hand_empty(), held.is_empty());

    for block in state.blocks() {
        let covered = supports.contains(&Support::On(block));
        let expected_clear = !covered && supports[block.index()] != Support::Held;
        assert_eq!(state.is_clear(block), expected_clear);
    }

    assert_eq!(&State::from_supports(supports).unwrap(), state);
}

fn solve(strategy: &dyn SearchStrategy, problem: &Problem) -> Solution {
    match strategy.search(problem, &StopSignal::new()).unwrap() {
        SearchOutcome::Found(solution) => solution,
        SearchOutcome::Interrupted(_) => panic!("{} was interrupted", strategy.name()),
    }
}

fn distance_to_goal(state: &State, goal: &Goal) -> usize {
    let path = bfs(
        state,
        |current| planner::successors(current).into_iter().map(|(_, next)| next),
        |current| current.satisfies(goal),
    );

    path.map(|path| path.len() - 1).expect("goal unreachable")
}

proptest! {
    #[test]
    fn legal_actions_keep_the_state_consistent(world in world(6)) {
        assert_consistent(&world.state);

        for action in world.state.legal_actions() {
            prop_assert!(action.is_fulfilled(&world.state));

            let next = world.state.apply(action).unwrap();
            assert_consistent(&next);

            let changed = world.state.blocks().filter(|b| world.state.support(*b) != next.support(*b)).count();
            prop_assert_eq!(changed, 1);
        }
    }

    #[test]
    fn inverse_action_restores_the_state(world in world(6)) {
        for action in world.state.legal_actions() {
            let next = world.state.apply(action).unwrap();
            prop_assert_eq!(next.apply(action.inverse()).unwrap(), world.state.clone());
        }
    }

    #[test]
    fn fast_plans_reach_the_goal(world in world(5)) {
        let problem = world.problem();

        for strategy in [
            &GreedyBestFirst::new(HeuristicKind::DomainTuned) as &dyn SearchStrategy,
            &Constructive,
        ] {
            let solution = solve(strategy, &problem);
            prop_assert!(solution.plan.replay(problem.initial()).unwrap().satisfies(problem.goal()));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn astar_finds_shortest_plans(world in world(4)) {
        let problem = world.problem();
        let shortest = distance_to_goal(problem.initial(), problem.goal());

        let solution = solve(&AStar::new(HeuristicKind::Admissible), &problem);

        prop_assert_eq!(solution.plan.len(), shortest);
        prop_assert!(solution.plan.replay(problem.initial()).unwrap().satisfies(problem.goal()));
    }

    #[test]
    fn admissible_estimate_is_a_lower_bound(world in world(4)) {
        let shortest = distance_to_goal(&world.state, &world.goal);

        prop_assert!(HeuristicKind::Admissible.estimate(&world.state, &world.goal) <= shortest);
        prop_assert_eq!(HeuristicKind::Admissible.estimate(&world.state, &world.goal) == 0, world.goal.is_fulfilled(&world.state));
    }
}
