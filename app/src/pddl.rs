//! Reader for blocks world problems in PDDL.
//!
//! Only the `:objects`, `:init` and `:goal` sections are interpreted. Names are case-insensitive.

use std::fmt::{self, Display, Formatter};
use std::path::Path;

use anyhow::{anyhow, bail, Context as _};
use planner::{Blocks, Fact, Goal, Problem, State, Support};

pub fn load(path: &Path) -> anyhow::Result<Problem> {
    let text = std::fs::read_to_string(path).with_context(|| format!("Error reading {}", path.display()))?;
    parse(&text).with_context(|| format!("Error loading problem {}", path.display()))
}

pub fn parse(text: &str) -> anyhow::Result<Problem> {
    let sections = Sections::read(&read(text)?)?;

    let mut blocks = Blocks::default();
    for name in &sections.objects {
        blocks.insert(name.as_str());
    }
    for literal in &sections.init {
        for name in literal.names() {
            blocks.insert(name);
        }
    }

    let initial = initial_state(&blocks, &sections.init)?;

    let facts = sections
        .goal
        .iter()
        .map(|literal| match literal {
            Literal::On(block, below) => Ok(Some(Fact::On(block.as_str(), below.as_str()))),
            Literal::OnTable(block) => Ok(Some(Fact::OnTable(block.as_str()))),
            Literal::Holding(block) => Err(anyhow!("Goal (holding {}) is not supported", block)),
            Literal::Derived => Ok(None),
        })
        .filter_map(Result::transpose)
        .collect::<anyhow::Result<Vec<_>>>()?;
    let goal = Goal::resolve(&blocks, facts)?;

    Ok(Problem::new(blocks, initial, goal)?)
}

fn initial_state(blocks: &Blocks, init: &[Literal]) -> anyhow::Result<State> {
    let mut supports: Vec<Option<Support>> = vec![None; blocks.len()];

    for literal in init {
        let (name, support) = match literal {
            Literal::On(block, below) => (block, Support::On(lookup(blocks, below)?)),
            Literal::OnTable(block) => (block, Support::Table),
            Literal::Holding(block) => bail!("Initial state holds {}, the arm must start empty", block),
            Literal::Derived => continue,
        };

        let slot = &mut supports[lookup(blocks, name)?.index()];
        if slot.is_some_and(|existing| existing != support) {
            bail!("Block {} has more than one support", name);
        }
        *slot = Some(support);
    }

    let supports = supports
        .into_iter()
        .map(|support| support.unwrap_or(Support::Table))
        .collect();

    Ok(State::from_supports(supports)?)
}

fn lookup(blocks: &Blocks, name: &str) -> anyhow::Result<planner::Block> {
    blocks.get(name).ok_or_else(|| anyhow!("Unknown block {}", name))
}

#[derive(Debug, Default)]
struct Sections {
    objects: Vec<String>,
    init: Vec<Literal>,
    goal: Vec<Literal>,
}

impl Sections {
    fn read(root: &Expr) -> anyhow::Result<Self> {
        let items = match root {
            Expr::List(items) if items.first().and_then(Expr::atom) == Some("define") => &items[1..],
            other => bail!("Expected (define ...), found {}", other),
        };

        let mut sections = Sections::default();
        let mut has_goal = false;

        for item in items {
            let Expr::List(section) = item else {
                bail!("Unexpected {} in problem definition", item);
            };

            match section.first().and_then(Expr::atom) {
                Some(":objects") => sections.objects.extend(objects(&section[1..])?),
                Some(":init") => {
                    for fact in &section[1..] {
                        sections.init.push(Literal::read(fact)?);
                    }
                }
                Some(":goal") => {
                    has_goal = true;
                    for fact in &section[1..] {
                        sections.goal.extend(conjunction(fact)?);
                    }
                }
                _ => {}
            }
        }

        if !has_goal {
            bail!("Problem has no :goal section");
        }

        Ok(sections)
    }
}

// Object lists may be typed: `a b c - block`
fn objects(items: &[Expr]) -> anyhow::Result<Vec<String>> {
    let mut names = vec![];
    let mut items = items.iter();

    while let Some(item) = items.next() {
        match item.atom() {
            Some("-") => {
                items.next();
            }
            Some(name) => names.push(name.to_owned()),
            None => bail!("Unexpected {} in :objects", item),
        }
    }

    Ok(names)
}

fn conjunction(expr: &Expr) -> anyhow::Result<Vec<Literal>> {
    match expr {
        Expr::List(items) if items.first().and_then(Expr::atom) == Some("and") => {
            items[1..].iter().map(Literal::read).collect()
        }
        _ => Ok(vec![Literal::read(expr)?]),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Literal {
    On(String, String),
    OnTable(String),
    Holding(String),
    //clear, arm-empty and friends follow from the supports
    Derived,
}

impl Literal {
    fn read(expr: &Expr) -> anyhow::Result<Self> {
        let Expr::List(items) = expr else {
            bail!("Expected a fact, found {}", expr);
        };

        let words = items
            .iter()
            .map(|item| item.atom().ok_or_else(|| anyhow!("Unsupported fact {}", expr)))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let literal = match words.as_slice() {
            ["on", block, below] => Literal::On(block.to_string(), below.to_string()),
            ["ontable" | "on-table", block] => Literal::OnTable(block.to_string()),
            ["holding", block] => Literal::Holding(block.to_string()),
            ["clear", _] | ["handempty" | "arm-empty" | "armempty"] => Literal::Derived,
            _ => bail!("Unsupported fact {}", expr),
        };

        Ok(literal)
    }

    fn names(&self) -> Vec<&str> {
        match self {
            Literal::On(block, below) => vec![block.as_str(), below.as_str()],
            Literal::OnTable(block) | Literal::Holding(block) => vec![block.as_str()],
            Literal::Derived => vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
    Atom(String),
    List(Vec<Expr>),
}

impl Expr {
    fn atom(&self) -> Option<&str> {
        match self {
            Expr::Atom(atom) => Some(atom),
            Expr::List(_) => None,
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Atom(atom) => write!(f, "{}", atom),
            Expr::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}

fn read(text: &str) -> anyhow::Result<Expr> {
    let mut stack: Vec<Vec<Expr>> = vec![vec![]];

    for token in tokens(text) {
        match token.as_str() {
            "(" => stack.push(vec![]),
            ")" => {
                let list = stack.pop().unwrap_or_default();
                let Some(parent) = stack.last_mut() else {
                    bail!("Unbalanced ')'");
                };
                parent.push(Expr::List(list));
            }
            _ => match stack.last_mut() {
                Some(current) => current.push(Expr::Atom(token)),
                None => bail!("Unbalanced ')'"),
            },
        }
    }

    if stack.len() != 1 {
        bail!("Missing ')' at end of input");
    }

    stack
        .pop()
        .into_iter()
        .flatten()
        .find(|expr| matches!(expr, Expr::List(_)))
        .ok_or_else(|| anyhow!("Empty problem file"))
}

fn tokens(text: &str) -> Vec<String> {
    let mut tokens = vec![];

    for line in text.lines() {
        let line = line.split(';').next().unwrap_or_default();
        for word in line.replace('(', " ( ").replace(')', " ) ").split_whitespace() {
            tokens.push(word.to_lowercase());
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner::{Action, PlanningError};

    const PROBLEM: &str = r#"
        ; four blocks, two towers
        (define (problem BW-4)
          (:domain blocksworld)
          (:objects A B C D)
          (:init (handempty)
                 (ontable a) (on b a) (clear b)
                 (ontable C) (on d c) (clear d))
          (:goal (and (on a b) (on b c) (on c d))))
    "#;

    #[test]
    fn reads_towers_and_goal() {
        let problem = parse(PROBLEM).unwrap();

        let blocks = problem.blocks();
        let [a, b, c, d] = ["a", "b", "c", "d"].map(|n| blocks.get(n).unwrap());
        assert_eq!(problem.initial().towers(), vec![vec![a, b], vec![c, d]]);
        assert_eq!(problem.goal().target(a), Some(Support::On(b)));
        assert_eq!(problem.goal().target(c), Some(Support::On(d)));
        assert_eq!(problem.goal().target(d), None);
    }

    #[test]
    fn blocks_without_support_stand_on_the_table() {
        let problem = parse("(define (problem p) (:objects a b) (:init (on a b)) (:goal (on b a)))").unwrap();

        let b = problem.blocks().get("b").unwrap();
        assert!(problem.initial().is_on_table(b));
        assert!(problem.initial().apply(Action::Unstack(problem.blocks().get("a").unwrap(), b)).is_ok());
    }

    #[test]
    fn single_goal_fact_and_typed_objects() {
        let problem =
            parse("(define (problem p) (:objects a b - block) (:init (ontable a) (ontable b)) (:goal (on a b)))").unwrap();

        assert_eq!(problem.blocks().len(), 2);
        assert!(problem.blocks().get("block").is_none());
    }

    #[test]
    fn rejects_held_block() {
        let result = parse("(define (problem p) (:objects a) (:init (holding a)) (:goal (ontable a)))");

        assert!(result.is_err());
    }

    #[test]
    fn rejects_conflicting_supports() {
        let result = parse("(define (problem p) (:objects a b) (:init (on a b) (ontable a)) (:goal (ontable a)))");

        assert!(format!("{:#}", result.unwrap_err()).contains("more than one support"));
    }

    #[test]
    fn rejects_cycles() {
        let result = parse("(define (problem p) (:objects a b) (:init (on a b) (on b a)) (:goal (ontable a)))");

        assert!(result.is_err());
    }

    #[test]
    fn rejects_contradicting_goal() {
        let result = parse("(define (problem p) (:objects a b) (:init) (:goal (and (on a b) (ontable a))))");

        assert!(result.is_err());
    }

    #[test]
    fn rejects_unbalanced_input() {
        assert!(parse("(define (problem p) (:objects a)").is_err());
        assert!(parse("(define (problem p)))").is_err());
    }

    #[test]
    fn loads_demo_problem() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../demos/reverse-towers.pddl");

        let problem = load(&path).unwrap();

        let stats = problem.stats();
        assert_eq!((stats.blocks, stats.initial_towers, stats.goal_towers), (6, 2, 2));
        assert_eq!(stats.upper_bound, 16);
    }

    #[test]
    fn rejects_goal_blocks_missing_from_objects_and_init() {
        let result = parse("(define (problem p) (:objects a b) (:init (ontable a) (ontable b)) (:goal (on a zz)))");

        let error = result.unwrap_err();
        assert!(matches!(error.downcast_ref::<PlanningError>(), Some(PlanningError::InvalidGoal(_))));
        assert!(format!("{:#}", error).contains("zz"));
    }

    #[test]
    fn rejects_unknown_predicates() {
        let result = parse("(define (problem p) (:objects a) (:init (painted a)) (:goal (ontable a)))");

        assert!(result.is_err());
    }
}
