//! Tests for GraphQuery
//!
//! These tests exercise acyclicity checks, simple-path enumeration, flow
//! projection and the title-keyed projection against small hand-built
//! documents.

#[cfg(test)]
mod tests {
    use crate::models::NodeId;
    use crate::services::{DocumentGraph, ErrorKind, GraphError};
    use std::collections::BTreeSet;

    /// Chain a -> b -> c -> d plus branch b -> e
    fn chain_with_branch() -> (DocumentGraph, [NodeId; 5]) {
        let mut graph = DocumentGraph::new();
        let a = graph.add_node("a", None);
        let b = graph.add_node("b", None);
        let c = graph.add_node("c", None);
        let d = graph.add_node("d", None);
        let e = graph.add_node("e", None);
        for (h, t) in [(a, b), (b, c), (c, d), (b, e)] {
            graph.add_edge(h, t).unwrap();
        }
        (graph, [a, b, c, d, e])
    }

    #[test]
    fn test_is_dag_tracks_mutations() {
        let (mut graph, [a, _, _, _, e]) = chain_with_branch();
        assert!(graph.query().is_dag());

        graph.add_edge(e, a).unwrap();
        assert!(!graph.query().is_dag());

        graph.remove_node(e).unwrap();
        assert!(graph.query().is_dag());
    }

    #[test]
    fn test_empty_graph_is_dag() {
        let graph = DocumentGraph::new();
        assert!(graph.query().is_dag());
        assert!(graph.query().topological_order().unwrap().is_empty());
    }

    #[test]
    fn test_simple_paths_single_path() {
        let mut graph = DocumentGraph::new();
        let a = graph.add_node("A", None);
        let b = graph.add_node("B", None);
        let c = graph.add_node("C", None);
        let d = graph.add_node("D", None);
        let e = graph.add_node("E", None);
        for (h, t) in [(a, b), (b, c), (c, e), (b, d)] {
            graph.add_edge(h, t).unwrap();
        }

        let query = graph.query();
        let paths: Vec<Vec<NodeId>> = query.simple_paths(a, e).unwrap().collect();
        assert_eq!(paths, vec![vec![a, b, c, e]]);

        let texts = query.flow_text(a, e).unwrap();
        assert_eq!(texts, vec![vec!["A", "B", "C", "E"]]);

        assert_eq!(query.flow_strings(a, e, " ").unwrap(), vec!["A B C E"]);
    }

    #[test]
    fn test_simple_paths_multiple_and_restartable() {
        let mut graph = DocumentGraph::new();
        let start = graph.add_node("start", None);
        let left = graph.add_node("left", None);
        let right = graph.add_node("right", None);
        let end = graph.add_node("end", None);
        for (h, t) in [(start, left), (start, right), (left, end), (right, end)] {
            graph.add_edge(h, t).unwrap();
        }

        let query = graph.query();
        let first: BTreeSet<Vec<NodeId>> = query.simple_paths(start, end).unwrap().collect();
        let second: BTreeSet<Vec<NodeId>> = query.simple_paths(start, end).unwrap().collect();

        assert_eq!(
            first,
            BTreeSet::from([vec![start, left, end], vec![start, right, end]])
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_simple_paths_terminate_with_cycle_elsewhere() {
        let (mut graph, [a, b, c, d, e]) = chain_with_branch();
        graph.add_edge(e, b).unwrap();
        assert!(!graph.query().is_dag());

        let paths: Vec<Vec<NodeId>> = graph.query().simple_paths(a, d).unwrap().collect();
        assert_eq!(paths, vec![vec![a, b, c, d]]);
    }

    #[test]
    fn test_simple_paths_is_lazy() {
        let (graph, [a, _, _, d, _]) = chain_with_branch();
        let mut paths = graph.query().simple_paths(a, d).unwrap();
        assert!(paths.next().is_some());
        assert!(paths.next().is_none());
    }

    #[test]
    fn test_simple_paths_edge_cases() {
        let (graph, [a, _, _, d, e]) = chain_with_branch();
        let query = graph.query();

        assert_eq!(query.simple_paths(a, a).unwrap().count(), 0);
        assert_eq!(query.simple_paths(d, a).unwrap().count(), 0);
        assert_eq!(query.simple_paths(e, d).unwrap().count(), 0);

        let err = query.simple_paths(a, NodeId::new(77)).unwrap_err();
        assert_eq!(err, GraphError::node_not_found(NodeId::new(77)));
        assert_eq!(
            query.flow_text(NodeId::new(77), a).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_topological_order() {
        let (mut graph, [a, b, c, d, e]) = chain_with_branch();

        let order = graph.query().topological_order().unwrap();
        let position = |id: NodeId| order.iter().position(|&n| n == id).unwrap();
        assert_eq!(order.len(), 5);
        assert!(position(a) < position(b));
        assert!(position(b) < position(c));
        assert!(position(c) < position(d));
        assert!(position(b) < position(e));

        graph.add_edge(d, a).unwrap();
        match graph.query().topological_order() {
            Err(GraphError::CycleDetected { node }) => {
                assert!([a, b, c, d].contains(&node));
            }
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_project_by_title() {
        let mut graph = DocumentGraph::new();
        let intro = graph.add_node("...", Some("Intro".to_string()));
        let body = graph.add_node("...", Some("Body".to_string()));
        let outro = graph.add_node("...", Some("Outro".to_string()));
        graph.add_edge(intro, body).unwrap();
        graph.add_edge(body, outro).unwrap();

        let projection = graph.query().project_by_title().unwrap();
        assert_eq!(
            projection.nodes,
            BTreeSet::from(["Intro".to_string(), "Body".to_string(), "Outro".to_string()])
        );
        assert!(projection.contains_edge("Intro", "Body"));
        assert!(projection.contains_edge("Body", "Outro"));
        assert!(!projection.contains_edge("Outro", "Intro"));
    }

    #[test]
    fn test_project_by_title_merges_duplicate_titles() {
        let mut graph = DocumentGraph::new();
        let a = graph.add_node("1", Some("Same".to_string()));
        let b = graph.add_node("2", Some("Same".to_string()));
        let c = graph.add_node("3", Some("Other".to_string()));
        graph.add_edge(a, c).unwrap();
        graph.add_edge(b, c).unwrap();

        let projection = graph.query().project_by_title().unwrap();
        assert_eq!(projection.nodes.len(), 2);
        assert_eq!(projection.edges.len(), 1);
    }

    #[test]
    fn test_project_by_title_reports_inconsistency() {
        let mut graph = DocumentGraph::new();
        graph.add_node("a", None);
        graph.topology_mut().add_node(NodeId::new(500));

        let err = graph.query().project_by_title().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
