//! Edge-list readers and writer.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use crate::store::{Direction, Graph, GraphStore};
use crate::types::{LinkTag, NodeIndex};

use super::{Endpoint, LoadError, LoadOptions};

/// One parsed data line.
struct Record<'a> {
    first: &'a str,
    second: &'a str,
    tag: Option<LinkTag>,
}

/// Split a line, or `None` for blank and comment lines.
fn parse_line(line: &str, number: usize) -> Result<Option<Record<'_>>, LoadError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('%') {
        return Ok(None);
    }

    let mut tokens = trimmed.split_whitespace();
    let (Some(first), Some(second)) = (tokens.next(), tokens.next()) else {
        return Err(LoadError::MissingEndpoint { line: number });
    };
    let tag = tokens.next().and_then(|t| t.parse().ok()).map(LinkTag);

    Ok(Some(Record { first, second, tag }))
}

/// Streams links into a graph, with simple-mode filtering, progress logging
/// and periodic compaction.
struct Ingest<'o, D: Direction, L> {
    graph: Graph<D, L>,
    options: &'o LoadOptions,
    skipped: usize,
}

impl<'o, D: Direction, L> Ingest<'o, D, L> {
    fn new(options: &'o LoadOptions) -> Self {
        Self {
            graph: Graph::new(),
            options,
            skipped: 0,
        }
    }

    fn link(&mut self, a: NodeIndex, b: NodeIndex, tag: Option<LinkTag>) {
        if self.options.simple && (a == b || self.graph.connected(a, b)) {
            self.skipped += 1;
            return;
        }
        self.graph.connect_with(a, b, tag);

        let links = self.graph.num_links();
        if self.options.log_interval > 0 && links % self.options.log_interval == 0 {
            tracing::info!(links, nodes = self.graph.size(), "edge list progress");
        }
        if self.options.compact_interval > 0 && links % self.options.compact_interval == 0 {
            self.graph.compact(self.options.compact_headroom);
            tracing::debug!(links, headroom = self.options.compact_headroom, "compacted");
        }
    }

    fn finish(mut self) -> Graph<D, L> {
        self.graph.sort();
        if self.options.clean {
            self.graph.compact(0);
        }
        tracing::info!(
            nodes = self.graph.size(),
            links = self.graph.num_links(),
            skipped = self.skipped,
            "finished reading edge list"
        );
        self.graph
    }
}

/// Read a labeled edge list. Nodes are numbered in order of first appearance
/// and labeled with their token.
pub fn read_edge_list<D: Direction, R: BufRead>(reader: R, options: &LoadOptions) -> Result<Graph<D, String>, LoadError> {
    let mut ingest: Ingest<'_, D, String> = Ingest::new(options);
    let mut ids: HashMap<String, NodeIndex> = HashMap::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(record) = parse_line(&line, i + 1)? else {
            continue;
        };

        let (first, second) = if options.bipartite {
            (format!("l{}", record.first), format!("r{}", record.second))
        } else {
            (record.first.to_string(), record.second.to_string())
        };

        let a = node_for(&mut ingest.graph, &mut ids, first, options.blank_labels);
        let b = node_for(&mut ingest.graph, &mut ids, second, options.blank_labels);
        ingest.link(a, b, record.tag);
    }

    Ok(ingest.finish())
}

fn node_for<D: Direction>(
    graph: &mut Graph<D, String>,
    ids: &mut HashMap<String, NodeIndex>,
    token: String,
    blank: bool,
) -> NodeIndex {
    if let Some(&node) = ids.get(&token) {
        return node;
    }
    let node = graph.add_node(if blank { String::new() } else { token.clone() });
    ids.insert(token, node);
    node
}

/// Read an edge list whose endpoints are integer ids. The graph gets nodes
/// `0..=max_id`; ids that never appear become isolated nodes.
pub fn read_edge_list_unlabeled<D: Direction, R: BufRead>(
    reader: R,
    options: &LoadOptions,
) -> Result<Graph<D, ()>, LoadError> {
    let mut ingest: Ingest<'_, D, ()> = Ingest::new(options);

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let number = i + 1;
        let Some(record) = parse_line(&line, number)? else {
            continue;
        };

        let a = parse_id(record.first, number, Endpoint::First, options.max_id)?;
        let b = parse_id(record.second, number, Endpoint::Second, options.max_id)?;

        // Both ids are at most `max_id`, which is below `usize::MAX`.
        let needed = a.max(b) + 1;
        while ingest.graph.size() < needed {
            ingest.graph.add_node(());
        }
        ingest.link(a, b, record.tag);
    }

    Ok(ingest.finish())
}

fn parse_id(token: &str, line: usize, position: Endpoint, max: usize) -> Result<NodeIndex, LoadError> {
    let id: u64 = token.parse().map_err(|_| LoadError::InvalidInteger {
        line,
        position,
        token: token.to_string(),
    })?;

    match usize::try_from(id) {
        Ok(node) if node <= max && node < usize::MAX => Ok(node),
        _ => Err(LoadError::IdTooLarge { line, position, id, max }),
    }
}

/// Write every link as a `first\tsecond` line.
pub fn write_edge_list<G: GraphStore + ?Sized, W: Write>(graph: &G, mut writer: W) -> std::io::Result<()> {
    for link in graph.links() {
        writeln!(writer, "{}\t{}", link.first, link.second)?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DiGraph, Directed, UnGraph, Undirected};
    use std::io::Cursor;

    const SAMPLE: &str = "\
# comment
% another comment

alice bob
bob carol 7
carol alice
";

    #[test]
    fn test_labeled_reading() {
        let graph: Graph<Directed, String> = read_edge_list(Cursor::new(SAMPLE), &LoadOptions::default()).unwrap();

        assert_eq!(graph.size(), 3);
        assert_eq!(graph.num_links(), 3);
        assert_eq!(graph.labels(), &["alice", "bob", "carol"]);
        assert!(graph.connected(2, 0));
        assert!(!graph.connected(0, 2));
        let tagged: Vec<_> = graph.links().filter_map(|l| l.tag).collect();
        assert_eq!(tagged, vec![LinkTag(7)]);
    }

    #[test]
    fn test_bipartite_and_blank() {
        let options = LoadOptions {
            bipartite: true,
            ..LoadOptions::default()
        };
        let graph: UnGraph<String> = read_edge_list(Cursor::new("1 1\n1 2\n"), &options).unwrap();
        assert_eq!(graph.labels(), &["l1", "r1", "r2"]);

        let options = LoadOptions {
            blank_labels: true,
            ..LoadOptions::default()
        };
        let graph: UnGraph<String> = read_edge_list(Cursor::new("x y\ny z\n"), &options).unwrap();
        assert_eq!(graph.size(), 3);
        assert!(graph.labels().iter().all(String::is_empty));
    }

    #[test]
    fn test_unlabeled_ensures_nodes() {
        let graph: DiGraph = read_edge_list_unlabeled(Cursor::new("0 5\n5 2\n"), &LoadOptions::default()).unwrap();

        assert_eq!(graph.size(), 6);
        assert_eq!(graph.num_links(), 2);
        assert_eq!(graph.degree(3), 0);
    }

    #[test]
    fn test_simple_mode_drops_loops_and_duplicates() {
        let input = "0 1\n1 0\n0 1\n2 2\n1 2\n";

        let undirected: Graph<Undirected, ()> = read_edge_list_unlabeled(Cursor::new(input), &LoadOptions::simple()).unwrap();
        assert_eq!(undirected.num_links(), 2);

        let directed: Graph<Directed, ()> = read_edge_list_unlabeled(Cursor::new(input), &LoadOptions::simple()).unwrap();
        assert_eq!(directed.num_links(), 3);

        let full: Graph<Directed, ()> = read_edge_list_unlabeled(Cursor::new(input), &LoadOptions::default()).unwrap();
        assert_eq!(full.num_links(), 5);
    }

    #[test]
    fn test_malformed_lines_report_line_number() {
        let err = read_edge_list::<Directed, _>(Cursor::new("a b\n\nlonely\n"), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::MissingEndpoint { line: 3 }));

        let err = read_edge_list_unlabeled::<Directed, _>(Cursor::new("0 1\n2 x\n"), &LoadOptions::default()).unwrap_err();
        match err {
            LoadError::InvalidInteger { line, position, token } => {
                assert_eq!(line, 2);
                assert_eq!(position, Endpoint::Second);
                assert_eq!(token, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_oversized_ids_are_rejected() {
        let err = read_edge_list_unlabeled::<Undirected, _>(
            Cursor::new("0 1\n0 18446744073709551615\n"),
            &LoadOptions::default(),
        )
        .unwrap_err();
        match err {
            LoadError::IdTooLarge { line, position, id, .. } => {
                assert_eq!(line, 2);
                assert_eq!(position, Endpoint::Second);
                assert_eq!(id, u64::MAX);
            }
            other => panic!("unexpected error: {other}"),
        }

        let options = LoadOptions {
            max_id: 100,
            ..LoadOptions::default()
        };
        let err = read_edge_list_unlabeled::<Directed, _>(Cursor::new("10000000000 3\n"), &options).unwrap_err();
        assert!(matches!(
            err,
            LoadError::IdTooLarge { line: 1, position: Endpoint::First, id: 10_000_000_000, max: 100 }
        ));

        let graph: DiGraph = read_edge_list_unlabeled(Cursor::new("100 3\n"), &options).unwrap();
        assert_eq!(graph.size(), 101);
    }

    #[test]
    fn test_periodic_compaction_keeps_links() {
        let options = LoadOptions {
            log_interval: 2,
            compact_interval: 3,
            compact_headroom: 1,
            ..LoadOptions::default()
        };
        let input: String = (1..20).map(|i| format!("{} {}\n", i - 1, i)).collect();

        let graph: UnGraph = read_edge_list_unlabeled(Cursor::new(input), &options).unwrap();

        assert_eq!(graph.num_links(), 19);
        assert_eq!(graph.size(), 20);
    }

    #[test]
    fn test_write_then_read() {
        let graph: DiGraph = read_edge_list_unlabeled(Cursor::new("0 1\n1 2\n2 0\n"), &LoadOptions::default()).unwrap();

        let mut out = Vec::new();
        write_edge_list(&graph, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "0\t1\n1\t2\n2\t0\n");

        let back: DiGraph = read_edge_list_unlabeled(Cursor::new(text), &LoadOptions::default()).unwrap();
        assert_eq!(back, graph);
    }
}
