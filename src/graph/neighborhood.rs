//! Two-hop neighborhood of a note, in the element shape cytoscape consumes

use serde::Serialize;
use std::collections::HashSet;

use super::GraphSnapshot;
use crate::helpers::label_for;

/// Node payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeData {
    pub id: String,
    pub label: String,
}

/// Edge payload. Edges point from the node further from the focal note
/// toward the nearer one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EdgeData {
    pub source: String,
    pub target: String,
}

/// One graph element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GraphElement {
    Node {
        data: NodeData,
        #[serde(skip_serializing_if = "is_false")]
        selected: bool,
    },
    Edge {
        data: EdgeData,
    },
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Elements around a focal note, in emission order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Neighborhood {
    elements: Vec<GraphElement>,
}

impl Neighborhood {
    fn push_node(&mut self, id: &str, label: String, selected: bool) {
        self.elements.push(GraphElement::Node {
            data: NodeData {
                id: id.to_string(),
                label,
            },
            selected,
        });
    }

    fn push_edge(&mut self, source: &str, target: &str) {
        self.elements.push(GraphElement::Edge {
            data: EdgeData {
                source: source.to_string(),
                target: target.to_string(),
            },
        });
    }

    /// All elements
    pub fn elements(&self) -> &[GraphElement] {
        &self.elements
    }

    /// Node payloads, in emission order
    pub fn nodes(&self) -> impl Iterator<Item = &NodeData> {
        self.elements.iter().filter_map(|e| match e {
            GraphElement::Node { data, .. } => Some(data),
            GraphElement::Edge { .. } => None,
        })
    }

    /// Edge payloads, in emission order
    pub fn edges(&self) -> impl Iterator<Item = &EdgeData> {
        self.elements.iter().filter_map(|e| match e {
            GraphElement::Edge { data } => Some(data),
            GraphElement::Node { .. } => None,
        })
    }

    /// The selected root node
    pub fn root(&self) -> Option<&NodeData> {
        self.elements.iter().find_map(|e| match e {
            GraphElement::Node {
                data,
                selected: true,
            } => Some(data),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Drop repeated nodes (by id) and repeated edges (by endpoints),
    /// keeping the first emission of each.
    pub fn dedup(self) -> Self {
        let mut seen_nodes = HashSet::new();
        let mut seen_edges = HashSet::new();
        let elements = self
            .elements
            .into_iter()
            .filter(|e| match e {
                GraphElement::Node { data, .. } => seen_nodes.insert(data.id.clone()),
                GraphElement::Edge { data } => seen_edges.insert(data.clone()),
            })
            .collect();
        Self { elements }
    }
}

impl GraphSnapshot {
    /// Expand the 2-hop neighborhood of `url`.
    ///
    /// The focal note comes first and is selected. Each backlink, then each
    /// outbound link, that resolves to a note is emitted with an edge to the
    /// focal note, followed by that note's own links and backlinks with
    /// edges pointing at it. Targets without a note are skipped at both
    /// hops. Repeated emissions are kept; call [`Neighborhood::dedup`] to
    /// collapse them.
    ///
    /// Returns `None` when `url` is not in the snapshot.
    pub fn neighborhood(&self, url: &str) -> Option<Neighborhood> {
        let focal = self.get(url)?;
        let mut hood = Neighborhood::default();
        hood.push_node(&focal.url, focal.title.clone(), true);

        for first in focal.backlinks.iter().chain(focal.links.iter()) {
            let Some(hop) = self.get(first) else {
                continue;
            };
            hood.push_node(&hop.url, label_for(&hop.url), false);
            hood.push_edge(&hop.url, &focal.url);

            for second in hop.links.iter().chain(hop.backlinks.iter()) {
                if !self.contains(second) {
                    continue;
                }
                hood.push_node(second, label_for(second), false);
                hood.push_edge(second, &hop.url);
            }
        }

        Some(hood)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Post;
    use std::collections::{HashMap, VecDeque};

    fn snapshot(edges: &[(&str, &[&str])]) -> GraphSnapshot {
        GraphSnapshot::build(
            edges
                .iter()
                .map(|(url, links)| Post::new(*url, "").with_links(links.iter().copied()))
                .collect(),
        )
    }

    /// Undirected hop distance from `from` over links and backlinks
    fn distances(graph: &GraphSnapshot, from: &str) -> HashMap<String, usize> {
        let mut dist = HashMap::new();
        let mut queue = VecDeque::new();
        dist.insert(from.to_string(), 0);
        queue.push_back(from.to_string());
        while let Some(url) = queue.pop_front() {
            let d = dist[&url];
            let post = graph.get(&url).unwrap();
            for next in post.links.iter().chain(post.backlinks.iter()) {
                if graph.contains(next) && !dist.contains_key(next) {
                    dist.insert(next.clone(), d + 1);
                    queue.push_back(next.clone());
                }
            }
        }
        dist
    }

    #[test]
    fn test_root_is_selected_and_labelled_with_title() {
        let mut post = Post::new("ideas/x", "");
        post.title = "The X".to_string();
        let graph = GraphSnapshot::build(vec![post]);
        let hood = graph.neighborhood("ideas/x").unwrap();
        assert_eq!(hood.len(), 1);
        let root = hood.root().unwrap();
        assert_eq!(root.id, "ideas/x");
        assert_eq!(root.label, "The X");
    }

    #[test]
    fn test_missing_focal_is_none() {
        let graph = snapshot(&[("a", &[])]);
        assert!(graph.neighborhood("nope").is_none());
    }

    #[test]
    fn test_edges_point_toward_focal() {
        // c -> f -> l
        let graph = snapshot(&[("f", &["l"]), ("l", &[]), ("c", &["f"])]);
        let hood = graph.neighborhood("f").unwrap().dedup();
        let edges: Vec<_> = hood
            .edges()
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect();
        // Backlinks expand before forward links
        assert_eq!(edges[0], ("c", "f"));
        assert!(edges.contains(&("l", "f")));
        assert!(edges.contains(&("f", "c")));
        assert!(edges.contains(&("f", "l")));
    }

    #[test]
    fn test_raw_expansion_keeps_duplicates() {
        // b and c both link to f and to each other
        let graph = snapshot(&[("f", &[]), ("b", &["f", "c"]), ("c", &["f", "b"])]);
        let raw = graph.neighborhood("f").unwrap();
        let f_nodes = raw.nodes().filter(|n| n.id == "f").count();
        assert!(f_nodes > 1, "raw expansion re-emits the focal note");

        let deduped = raw.clone().dedup();
        let ids: Vec<_> = deduped.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["f", "b", "c"]);
        assert!(deduped.len() < raw.len());
        let mut edges: Vec<_> = deduped.edges().cloned().collect();
        let before = edges.len();
        edges.dedup();
        assert_eq!(edges.len(), before);
    }

    #[test]
    fn test_dangling_targets_are_dropped() {
        let graph = snapshot(&[("f", &["gone", "l"]), ("l", &["also-gone"])]);
        let hood = graph.neighborhood("f").unwrap();
        assert!(hood.nodes().all(|n| n.id != "gone" && n.id != "also-gone"));
        assert!(hood.edges().all(|e| e.source != "also-gone"));
    }

    #[test]
    fn test_never_beyond_two_hops() {
        // A chain f - 1 - 2 - 3 - 4 plus a branch from 1
        let graph = snapshot(&[
            ("f", &["n1"]),
            ("n1", &["n2", "side"]),
            ("n2", &["n3"]),
            ("n3", &["n4"]),
            ("n4", &[]),
            ("side", &[]),
        ]);
        for post in graph.posts() {
            let dist = distances(&graph, &post.url);
            let hood = graph.neighborhood(&post.url).unwrap();
            for node in hood.nodes() {
                assert!(dist[&node.id] <= 2, "{} from {}", node.id, post.url);
            }
        }
        let ids: HashSet<_> = graph
            .neighborhood("f")
            .unwrap()
            .nodes()
            .map(|n| n.id.clone())
            .collect();
        assert!(ids.contains("n2"));
        assert!(ids.contains("side"));
        assert!(!ids.contains("n3"));
    }

    #[test]
    fn test_labels_are_last_segment() {
        let graph = snapshot(&[("f", &["notes/my idea", "100%25"]), ("notes/my idea", &[]), ("100%25", &[])]);
        let hood = graph.neighborhood("f").unwrap();
        assert!(hood.nodes().any(|n| n.label == "my idea"));
        assert!(hood.nodes().any(|n| n.id == "100%25" && n.label == "100%25"));
    }

    #[test]
    fn test_serializes_as_cytoscape_elements() {
        let graph = snapshot(&[("f", &["l"]), ("l", &[])]);
        let hood = graph.neighborhood("f").unwrap().dedup();
        let json = serde_json::to_value(&hood).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"data": {"id": "f", "label": "f"}, "selected": true},
                {"data": {"id": "l", "label": "l"}},
                {"data": {"source": "l", "target": "f"}},
                {"data": {"source": "f", "target": "l"}},
            ])
        );
    }
}
