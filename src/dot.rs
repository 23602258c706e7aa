use crate::diagram::{Attrs, ClusterId, Diagram, Edge, Node};

const GRAPH_DEFAULTS: &[(&str, &str)] = &[
    ("fontname", "Sans-Serif"),
    ("fontsize", "15"),
    ("nodesep", "0.60"),
    ("ranksep", "0.75"),
    ("splines", "ortho"),
];

const CLUSTER_DEFAULTS: &[(&str, &str)] = &[
    ("style", "rounded"),
    ("color", "#AEB6BE"),
    ("labeljust", "l"),
    ("fontsize", "12"),
];

// shades cycle as clusters nest deeper
const CLUSTER_BGCOLORS: [&str; 4] = ["#E5F5FD", "#EBF3E7", "#ECE8F6", "#FDF7E3"];

const NODE_DEFAULTS: &[(&str, &str)] = &[
    ("style", "filled"),
    ("fontname", "Sans-Serif"),
    ("fontsize", "13"),
    ("fontcolor", "#2D3436"),
];

const EDGE_DEFAULTS: &[(&str, &str)] = &[
    ("color", "#7B8894"),
    ("fontname", "Sans-Serif"),
    ("fontsize", "13"),
    ("fontcolor", "#2D3436"),
];

fn escape_dot(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn merged(defaults: &[(&str, &str)], overrides: &Attrs) -> Attrs {
    let mut attrs = Attrs::default();
    for (k, v) in defaults {
        attrs.set(*k, *v);
    }
    for (k, v) in overrides.iter() {
        attrs.set(k, v);
    }
    attrs
}

fn attr_list<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    pairs
        .into_iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_dot(v)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn cluster_bgcolor(depth: usize) -> &'static str {
    CLUSTER_BGCOLORS[depth.saturating_sub(1) % CLUSTER_BGCOLORS.len()]
}

fn node_id(node: &Node) -> String {
    format!("n{}", node.id.index())
}

pub fn to_dot(diagram: &Diagram) -> String {
    let mut out = String::from("digraph diagram {\n");
    out.push_str(&format!("  rankdir={};\n", diagram.direction.as_str()));
    out.push_str("  compound=true;\n");
    out.push_str(&format!("  label=\"{}\";\n", escape_dot(&diagram.name)));
    out.push_str("  labelloc=t;\n");

    for (k, v) in merged(GRAPH_DEFAULTS, &diagram.graph_attrs).iter() {
        out.push_str(&format!("  {}=\"{}\";\n", k, escape_dot(v)));
    }
    out.push_str(&format!(
        "  node [{}];\n",
        attr_list(merged(NODE_DEFAULTS, &diagram.node_attrs).iter())
    ));
    out.push_str(&format!(
        "  edge [{}];\n",
        attr_list(merged(EDGE_DEFAULTS, &diagram.edge_attrs).iter())
    ));

    write_scope(&mut out, diagram, None, 1);

    for edge in &diagram.edges {
        write_edge(&mut out, diagram, edge);
    }

    out.push_str("}\n");
    out
}

fn write_scope(out: &mut String, diagram: &Diagram, scope: Option<ClusterId>, depth: usize) {
    let indent = "  ".repeat(depth);

    for node in diagram.nodes_in(scope) {
        let style = node.kind.style();
        out.push_str(&format!(
            "{}\"{}\" [{}];\n",
            indent,
            node_id(node),
            attr_list([
                ("label", node.label.as_str()),
                ("shape", style.shape),
                ("fillcolor", style.fillcolor),
            ])
        ));
    }

    for cluster in diagram.child_clusters(scope) {
        out.push_str(&format!(
            "{}subgraph \"cluster_{}\" {{\n",
            indent,
            cluster.id.index()
        ));
        let inner = "  ".repeat(depth + 1);
        out.push_str(&format!("{}label=\"{}\";\n", inner, escape_dot(&cluster.label)));
        for (k, v) in CLUSTER_DEFAULTS {
            out.push_str(&format!("{}{}=\"{}\";\n", inner, k, v));
        }
        out.push_str(&format!(
            "{}bgcolor=\"{}\";\n",
            inner,
            cluster_bgcolor(diagram.cluster_depth(cluster.id))
        ));
        write_scope(out, diagram, Some(cluster.id), depth + 1);
        out.push_str(&format!("{}}}\n", indent));
    }
}

fn write_edge(out: &mut String, diagram: &Diagram, edge: &Edge) {
    let mut attrs: Vec<(&str, &str)> = Vec::new();
    if let Some(label) = &edge.label {
        attrs.push(("label", label.as_str()));
    }
    if let Some(style) = edge.style {
        attrs.push(("style", style.as_str()));
    }
    if !edge.directed {
        attrs.push(("dir", "none"));
        attrs.push(("constraint", "false"));
    }

    let from = node_id(diagram.node(edge.from));
    let to = node_id(diagram.node(edge.to));
    if attrs.is_empty() {
        out.push_str(&format!("  \"{}\" -> \"{}\";\n", from, to));
    } else {
        out.push_str(&format!(
            "  \"{}\" -> \"{}\" [{}];\n",
            from,
            to,
            attr_list(attrs)
        ));
    }
}
