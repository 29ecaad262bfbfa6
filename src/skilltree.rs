//! Prerequisite graph engine for the skill tree.
//!
//! The free functions work on any node slice and hold no state. `SkillTree` wraps a
//! validated, immutable curriculum: unknown ids, duplicates and cycles are rejected
//! once at load time, and levels are computed a single time in topological order.
//!
//! Completion state is always owned by the caller and passed in per query.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::domain::{Certificate, LearningNode};
use crate::error::CurriculumError;

/// Ids of the goals a learner has completed.
pub type CompletionState = BTreeSet<String>;

const COLUMN_WIDTH: f64 = 200.0;
const COLUMN_OFFSET: f64 = 80.0;
const CARD_HEIGHT: f64 = 140.0;
const CARD_SPACING: f64 = 20.0;
const TOP_MARGIN: f64 = 20.0;

fn index_by_id(nodes: &[LearningNode]) -> HashMap<&str, &LearningNode> {
  nodes.iter().map(|n| (n.id.as_str(), n)).collect()
}

/// Nodes whose prerequisites are all completed. Roots are always accessible.
pub fn accessible_nodes(nodes: &[LearningNode], completed: &CompletionState) -> BTreeSet<String> {
  nodes
    .iter()
    .filter(|n| n.prerequisites.iter().all(|p| completed.contains(p)))
    .map(|n| n.id.clone())
    .collect()
}

/// Longest path from a root. Roots and unknown ids are level 0.
///
/// A node met again on the current recursion stack counts as 0, so cyclic input
/// terminates (with a meaningless level). `SkillTree::new` rejects such input.
pub fn level(node_id: &str, nodes: &[LearningNode]) -> usize {
  let by_id = index_by_id(nodes);
  match by_id.get(node_id).copied() {
    Some(node) => level_guarded(node, &by_id, &mut HashSet::new()),
    None => 0,
  }
}

fn level_guarded<'a>(
  node: &'a LearningNode,
  by_id: &HashMap<&'a str, &'a LearningNode>,
  on_stack: &mut HashSet<&'a str>,
) -> usize {
  if !on_stack.insert(node.id.as_str()) {
    return 0;
  }
  let deepest = node
    .prerequisites
    .iter()
    .map(|p| match by_id.get(p.as_str()).copied() {
      Some(prereq) => level_guarded(prereq, by_id, on_stack),
      None => 0,
    })
    .max();
  on_stack.remove(node.id.as_str());
  deepest.map_or(0, |d| d + 1)
}

/// Required goals plus everything they transitively depend on.
pub fn certificate_path(certificate: &Certificate, nodes: &[LearningNode]) -> BTreeSet<String> {
  let by_id = index_by_id(nodes);
  let mut path = BTreeSet::new();
  let mut stack: Vec<&str> = certificate.required_goals.iter().rev().map(String::as_str).collect();

  while let Some(id) = stack.pop() {
    if !path.insert(id.to_string()) {
      continue;
    }
    if let Some(node) = by_id.get(id) {
      stack.extend(node.prerequisites.iter().map(String::as_str));
    }
  }
  path
}

/// Required goals that no other node on the certificate path depends on.
/// May be empty.
pub fn certificate_end_goals(certificate: &Certificate, nodes: &[LearningNode]) -> BTreeSet<String> {
  let path = certificate_path(certificate, nodes);
  certificate
    .required_goals
    .iter()
    .filter(|goal| {
      !nodes.iter().any(|n| {
        path.contains(&n.id) && &n.id != *goal && n.prerequisites.contains(*goal)
      })
    })
    .cloned()
    .collect()
}

/// Where the renderer should draw a node card.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct NodePosition {
  pub x: f64,
  pub y: f64,
  pub level: usize,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct CertificateProgress {
  pub completed: usize,
  pub total: usize,
  pub percent: u8,
}

/// Validated, immutable curriculum.
#[derive(Clone, Debug)]
pub struct SkillTree {
  nodes: Vec<LearningNode>,
  certificates: Vec<Certificate>,
  index: HashMap<String, usize>,
  // parallel to `nodes`
  levels: Vec<usize>,
}

impl SkillTree {
  #[instrument(level = "info", skip_all, fields(nodes = nodes.len(), certificates = certificates.len()))]
  pub fn new(nodes: Vec<LearningNode>, certificates: Vec<Certificate>) -> Result<Self, CurriculumError> {
    let mut index = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
      if index.insert(node.id.clone(), i).is_some() {
        return Err(CurriculumError::DuplicateNode(node.id.clone()));
      }
    }

    for node in &nodes {
      if let Some(missing) = node.prerequisites.iter().find(|p| !index.contains_key(*p)) {
        return Err(CurriculumError::UnknownPrerequisite {
          node: node.id.clone(),
          prerequisite: missing.clone(),
        });
      }
    }

    let mut cert_ids = HashSet::new();
    for cert in &certificates {
      if !cert_ids.insert(cert.id.as_str()) {
        return Err(CurriculumError::DuplicateCertificate(cert.id.clone()));
      }
      if let Some(missing) = cert.required_goals.iter().find(|g| !index.contains_key(*g)) {
        return Err(CurriculumError::UnknownGoal {
          certificate: cert.id.clone(),
          goal: missing.clone(),
        });
      }
    }

    let levels = topological_levels(&nodes, &index)?;

    let tree = Self { nodes, certificates, index, levels };
    for (level, ids) in tree.levels().iter().enumerate() {
      debug!(target: "skilltree", level, count = ids.len(), "generation");
    }
    info!(
      target: "skilltree",
      nodes = tree.nodes.len(),
      certificates = tree.certificates.len(),
      depth = tree.levels().len(),
      "Skill tree loaded"
    );
    Ok(tree)
  }

  pub fn nodes(&self) -> &[LearningNode] {
    &self.nodes
  }

  pub fn node(&self, id: &str) -> Option<&LearningNode> {
    self.index.get(id).map(|&i| &self.nodes[i])
  }

  pub fn certificates(&self) -> &[Certificate] {
    &self.certificates
  }

  pub fn certificate(&self, id: &str) -> Option<&Certificate> {
    self.certificates.iter().find(|c| c.id == id)
  }

  pub fn accessible(&self, completed: &CompletionState) -> BTreeSet<String> {
    accessible_nodes(&self.nodes, completed)
  }

  pub fn level_of(&self, id: &str) -> Option<usize> {
    self.index.get(id).map(|&i| self.levels[i])
  }

  /// Node ids grouped by level, definition order inside each group.
  pub fn levels(&self) -> Vec<Vec<String>> {
    let depth = self.levels.iter().max().map_or(0, |m| m + 1);
    let mut groups = vec![Vec::new(); depth];
    for (node, &level) in self.nodes.iter().zip(&self.levels) {
      groups[level].push(node.id.clone());
    }
    groups
  }

  /// Left-to-right layout: one column per level, each column centred
  /// against the tallest one.
  pub fn layout(&self) -> BTreeMap<String, NodePosition> {
    let groups = self.levels();
    let row = CARD_HEIGHT + CARD_SPACING;
    let max_in_level = groups.iter().map(Vec::len).max().unwrap_or(0);
    let max_height = max_in_level as f64 * row;

    let mut positions = BTreeMap::new();
    for (level, ids) in groups.iter().enumerate() {
      let start_y = (max_height - ids.len() as f64 * row) / 2.0;
      for (i, id) in ids.iter().enumerate() {
        positions.insert(
          id.clone(),
          NodePosition {
            x: level as f64 * COLUMN_WIDTH + COLUMN_OFFSET,
            y: start_y + i as f64 * row + TOP_MARGIN,
            level,
          },
        );
      }
    }
    positions
  }

  pub fn starting_goals(&self) -> Vec<&LearningNode> {
    self.nodes.iter().filter(|n| n.prerequisites.is_empty()).collect()
  }

  pub fn goals_with_content(&self) -> Vec<&LearningNode> {
    self.nodes.iter().filter(|n| n.has_content).collect()
  }

  /// Transitive prerequisites of a goal, not including the goal itself.
  pub fn all_prerequisites(&self, goal_id: &str) -> Option<BTreeSet<String>> {
    let goal = self.node(goal_id)?;
    let mut seen = BTreeSet::new();
    let mut stack: Vec<&str> = goal.prerequisites.iter().map(String::as_str).collect();
    while let Some(id) = stack.pop() {
      if seen.insert(id.to_string()) {
        if let Some(node) = self.node(id) {
          stack.extend(node.prerequisites.iter().map(String::as_str));
        }
      }
    }
    Some(seen)
  }

  pub fn certificate_path(&self, certificate_id: &str) -> Option<BTreeSet<String>> {
    self.certificate(certificate_id).map(|c| certificate_path(c, &self.nodes))
  }

  pub fn certificate_end_goals(&self, certificate_id: &str) -> Option<BTreeSet<String>> {
    self.certificate(certificate_id).map(|c| certificate_end_goals(c, &self.nodes))
  }

  /// Unknown certificates are never earned.
  pub fn is_certificate_earned(&self, certificate_id: &str, completed: &CompletionState) -> bool {
    self
      .certificate(certificate_id)
      .is_some_and(|c| c.required_goals.iter().all(|g| completed.contains(g)))
  }

  pub fn certificate_progress(&self, certificate_id: &str, completed: &CompletionState) -> Option<CertificateProgress> {
    let cert = self.certificate(certificate_id)?;
    let total = cert.required_goals.len();
    let done = cert.required_goals.iter().filter(|g| completed.contains(*g)).count();
    let percent = if total == 0 {
      100
    } else {
      ((done as f64 / total as f64) * 100.0).round() as u8
    };
    Some(CertificateProgress { completed: done, total, percent })
  }
}

/// Kahn's algorithm. Returns each node's longest distance from a root, or the
/// nodes that never reach in-degree zero.
fn topological_levels(nodes: &[LearningNode], index: &HashMap<String, usize>) -> Result<Vec<usize>, CurriculumError> {
  let mut in_degree: Vec<usize> = nodes.iter().map(|n| n.prerequisites.len()).collect();
  let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
  for (i, node) in nodes.iter().enumerate() {
    for p in &node.prerequisites {
      dependents[index[p]].push(i);
    }
  }

  let mut levels = vec![0usize; nodes.len()];
  let mut queue: VecDeque<usize> = (0..nodes.len()).filter(|&i| in_degree[i] == 0).collect();
  let mut visited = 0;

  while let Some(i) = queue.pop_front() {
    visited += 1;
    for &d in &dependents[i] {
      levels[d] = levels[d].max(levels[i] + 1);
      in_degree[d] -= 1;
      if in_degree[d] == 0 {
        queue.push_back(d);
      }
    }
  }

  if visited < nodes.len() {
    let stuck = nodes
      .iter()
      .zip(&in_degree)
      .filter(|(_, &deg)| deg > 0)
      .map(|(n, _)| n.id.clone())
      .collect();
    return Err(CurriculumError::Cycle(stuck));
  }
  Ok(levels)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::seeds::{seed_certificates, seed_skill_nodes};
  use proptest::prelude::*;

  fn node(id: &str, prerequisites: &[&str]) -> LearningNode {
    LearningNode {
      id: id.into(),
      title: id.into(),
      description: String::new(),
      hint: String::new(),
      prerequisites: prerequisites.iter().map(|p| p.to_string()).collect(),
      has_content: false,
    }
  }

  fn cert(id: &str, goals: &[&str]) -> Certificate {
    Certificate {
      id: id.into(),
      title: id.into(),
      description: String::new(),
      icon: String::new(),
      color: String::new(),
      required_goals: goals.iter().map(|g| g.to_string()).collect(),
    }
  }

  fn set(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
  }

  fn seeded() -> SkillTree {
    SkillTree::new(seed_skill_nodes(), seed_certificates()).expect("seed curriculum is valid")
  }

  #[test]
  fn child_unlocks_once_root_is_completed() {
    let nodes = vec![node("root", &[]), node("child", &["root"])];
    assert_eq!(accessible_nodes(&nodes, &set(&[])), set(&["root"]));
    assert_eq!(accessible_nodes(&nodes, &set(&["root"])), set(&["root", "child"]));
  }

  #[test]
  fn unknown_completed_ids_are_ignored() {
    let nodes = vec![node("root", &[]), node("child", &["root"])];
    assert_eq!(accessible_nodes(&nodes, &set(&["ghost"])), set(&["root"]));
  }

  #[test]
  fn diamond_uses_longest_path() {
    let nodes = vec![
      node("a", &[]),
      node("b", &["a"]),
      node("c", &["b"]),
      node("d", &["a", "c"]),
    ];
    assert_eq!(level("d", &nodes), 3);
    let tree = SkillTree::new(nodes, vec![]).unwrap();
    assert_eq!(tree.level_of("d"), Some(3));
    assert_eq!(tree.levels(), vec![vec!["a"], vec!["b"], vec!["c"], vec!["d"]]);
  }

  #[test]
  fn level_terminates_on_cycles() {
    let nodes = vec![node("a", &["b"]), node("b", &["a"])];
    // the node met again on the stack counts as 0: b = 1 + 0, then a = 1 + 1
    assert_eq!(level("a", &nodes), 2);
    assert_eq!(level("b", &nodes), 2);
    assert_eq!(level("missing", &nodes), 0);
  }

  #[test]
  fn rejects_cycles_at_load() {
    let nodes = vec![node("r", &[]), node("a", &["r", "b"]), node("b", &["a"])];
    let err = SkillTree::new(nodes, vec![]).unwrap_err();
    assert_eq!(err, CurriculumError::Cycle(vec!["a".into(), "b".into()]));
  }

  #[test]
  fn rejects_self_prerequisite() {
    let err = SkillTree::new(vec![node("a", &["a"])], vec![]).unwrap_err();
    assert!(matches!(err, CurriculumError::Cycle(ids) if ids == vec!["a".to_string()]));
  }

  #[test]
  fn rejects_unknown_ids_and_duplicates() {
    assert_eq!(
      SkillTree::new(vec![node("a", &["zzz"])], vec![]).unwrap_err(),
      CurriculumError::UnknownPrerequisite { node: "a".into(), prerequisite: "zzz".into() }
    );
    assert_eq!(
      SkillTree::new(vec![node("a", &[]), node("a", &[])], vec![]).unwrap_err(),
      CurriculumError::DuplicateNode("a".into())
    );
    assert_eq!(
      SkillTree::new(vec![node("a", &[])], vec![cert("c", &["a", "nope"])]).unwrap_err(),
      CurriculumError::UnknownGoal { certificate: "c".into(), goal: "nope".into() }
    );
    assert_eq!(
      SkillTree::new(vec![node("a", &[])], vec![cert("c", &["a"]), cert("c", &["a"])]).unwrap_err(),
      CurriculumError::DuplicateCertificate("c".into())
    );
  }

  #[test]
  fn seed_levels_match_curriculum_generations() {
    let tree = seeded();
    assert_eq!(tree.level_of("ai-text-generation"), Some(0));
    assert_eq!(tree.level_of("temperature-randomness"), Some(1));
    assert_eq!(tree.level_of("prompt-engineering"), Some(2));
    assert_eq!(tree.level_of("ethical-ai-use"), Some(3));
    assert_eq!(tree.level_of("ai-for-coding"), Some(4));
    assert_eq!(tree.level_of("unknown"), None);
    assert_eq!(tree.starting_goals().len(), 3);
    assert_eq!(tree.goals_with_content().len(), 1);
  }

  #[test]
  fn fundamentals_path_ends_at_fact_checking() {
    let tree = seeded();
    assert_eq!(
      tree.certificate_path("ai-fundamentals").unwrap(),
      set(&["ai-text-generation", "ai-hallucinations", "fact-checking"])
    );
    assert_eq!(tree.certificate_end_goals("ai-fundamentals").unwrap(), set(&["fact-checking"]));
  }

  #[test]
  fn responsible_ai_pulls_in_unrequired_prerequisites() {
    let tree = seeded();
    let path = tree.certificate_path("responsible-ai").unwrap();
    assert!(path.contains("fact-checking"));
    assert!(path.contains("ai-text-generation"));
    assert_eq!(
      tree.certificate_end_goals("responsible-ai").unwrap(),
      set(&["ai-limitations", "ethical-ai-use"])
    );
  }

  #[test]
  fn end_goals_of_a_chain_and_of_an_empty_certificate() {
    let nodes = vec![node("a", &[]), node("b", &["a"]), node("c", &["b"])];
    assert_eq!(certificate_end_goals(&cert("x", &["a", "b", "c"]), &nodes), set(&["c"]));
    assert_eq!(certificate_end_goals(&cert("y", &["a"]), &nodes), set(&["a"]));
    assert_eq!(certificate_end_goals(&cert("z", &[]), &nodes), set(&[]));
  }

  #[test]
  fn progress_and_earned() {
    let tree = seeded();
    let done = set(&["ai-text-generation", "ai-hallucinations"]);
    let progress = tree.certificate_progress("ai-fundamentals", &done).unwrap();
    assert_eq!(progress, CertificateProgress { completed: 2, total: 3, percent: 67 });
    assert!(!tree.is_certificate_earned("ai-fundamentals", &done));

    let all = set(&["ai-text-generation", "ai-hallucinations", "fact-checking"]);
    assert!(tree.is_certificate_earned("ai-fundamentals", &all));
    assert!(!tree.is_certificate_earned("no-such-cert", &all));
  }

  #[test]
  fn all_prerequisites_excludes_goal() {
    let tree = seeded();
    assert_eq!(
      tree.all_prerequisites("advanced-prompting").unwrap(),
      set(&["prompt-engineering", "temperature-randomness", "ai-text-generation"])
    );
    assert_eq!(tree.all_prerequisites("what-is-ai").unwrap(), set(&[]));
    assert!(tree.all_prerequisites("nope").is_none());
  }

  #[test]
  fn layout_centres_columns_against_widest_level() {
    let tree = seeded();
    let layout = tree.layout();
    assert_eq!(layout.len(), tree.nodes().len());
    // widest column has five cards, the first column three
    assert_eq!(layout["ai-text-generation"], NodePosition { x: 80.0, y: 180.0, level: 0 });
    assert_eq!(layout["temperature-randomness"], NodePosition { x: 280.0, y: 20.0, level: 1 });
    assert_eq!(layout["ai-for-writing"].x, 880.0);
  }

  fn arb_nodes() -> impl Strategy<Value = Vec<LearningNode>> {
    prop::collection::vec(prop::collection::vec(any::<prop::sample::Index>(), 0..3), 1..12).prop_map(|raw| {
      raw
        .iter()
        .enumerate()
        .map(|(i, picks)| {
          let mut prerequisites: Vec<String> = if i == 0 {
            Vec::new()
          } else {
            picks.iter().map(|ix| format!("n{}", ix.index(i))).collect()
          };
          prerequisites.sort();
          prerequisites.dedup();
          LearningNode { prerequisites, ..node(&format!("n{i}"), &[]) }
        })
        .collect()
    })
  }

  fn pick(nodes: &[LearningNode], bits: &[bool]) -> BTreeSet<String> {
    nodes.iter().zip(bits).filter(|(_, &b)| b).map(|(n, _)| n.id.clone()).collect()
  }

  proptest! {
    #[test]
    fn accessibility_is_monotonic(nodes in arb_nodes(), a in prop::collection::vec(any::<bool>(), 12), b in prop::collection::vec(any::<bool>(), 12)) {
      let small = pick(&nodes, &a);
      let mut large = small.clone();
      large.extend(pick(&nodes, &b));
      let before = accessible_nodes(&nodes, &small);
      let after = accessible_nodes(&nodes, &large);
      prop_assert!(before.is_subset(&after));
      prop_assert_eq!(before, accessible_nodes(&nodes, &small));
    }

    #[test]
    fn roots_always_accessible(nodes in arb_nodes(), a in prop::collection::vec(any::<bool>(), 12)) {
      let accessible = accessible_nodes(&nodes, &pick(&nodes, &a));
      for n in nodes.iter().filter(|n| n.prerequisites.is_empty()) {
        prop_assert!(accessible.contains(&n.id));
      }
    }

    #[test]
    fn levels_increase_along_edges(nodes in arb_nodes()) {
      let tree = SkillTree::new(nodes.clone(), vec![]).unwrap();
      for n in &nodes {
        prop_assert_eq!(tree.level_of(&n.id), Some(level(&n.id, &nodes)));
        for p in &n.prerequisites {
          prop_assert!(level(p, &nodes) < level(&n.id, &nodes));
        }
      }
    }

    #[test]
    fn certificate_sets_nest(nodes in arb_nodes(), bits in prop::collection::vec(any::<bool>(), 12)) {
      let goals: Vec<String> = pick(&nodes, &bits).into_iter().collect();
      let c = Certificate { required_goals: goals.clone(), ..cert("c", &[]) };
      let path = certificate_path(&c, &nodes);
      let required: BTreeSet<String> = goals.into_iter().collect();
      prop_assert!(required.is_subset(&path));
      prop_assert!(certificate_end_goals(&c, &nodes).is_subset(&required));
      prop_assert_eq!(path, certificate_path(&c, &nodes));
    }
  }
}
