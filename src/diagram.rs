use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ClusterId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl ClusterId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    InternetGateway,
    RouteTable,
    SecurityBoundary,
    Compute,
    Database,
    PrivateSubnet,
    User,
}

/// Graphviz appearance standing in for a resource icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeStyle {
    pub shape: &'static str,
    pub fillcolor: &'static str,
}

impl NodeKind {
    pub fn style(self) -> NodeStyle {
        let (shape, fillcolor) = match self {
            NodeKind::InternetGateway => ("doubleoctagon", "#8C4FFF"),
            NodeKind::RouteTable => ("tab", "#B39DDB"),
            // security groups have no icon of their own, drawn as a shield-like house
            NodeKind::SecurityBoundary => ("invhouse", "#DD344C"),
            NodeKind::Compute => ("box3d", "#ED7100"),
            NodeKind::Database => ("cylinder", "#3B48CC"),
            NodeKind::PrivateSubnet => ("folder", "#7AA116"),
            NodeKind::User => ("egg", "#E0E0E0"),
        };
        NodeStyle { shape, fillcolor }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    Dashed,
}

impl EdgeStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeStyle::Dashed => "dashed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    #[serde(rename = "TB")]
    TopBottom,
    #[serde(rename = "LR")]
    LeftRight,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::TopBottom => "TB",
            Direction::LeftRight => "LR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    pub id: ClusterId,
    pub label: String,
    pub parent: Option<ClusterId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub label: String,
    pub cluster: Option<ClusterId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub label: Option<String>,
    pub style: Option<EdgeStyle>,
    pub directed: bool,
}

impl Edge {
    pub fn labeled(&mut self, text: impl Into<String>) -> &mut Self {
        self.label = Some(text.into());
        self
    }

    pub fn styled(&mut self, style: EdgeStyle) -> &mut Self {
        self.style = Some(style);
        self
    }
}

/// Ordered attribute list; setting an existing key overwrites it in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Attrs(Vec<(String, String)>);

impl Attrs {
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
impl Attrs {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A fully declared diagram: title, output name, defaults and the node/cluster/edge tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagram {
    pub name: String,
    pub filename: String,
    pub direction: Direction,
    pub graph_attrs: Attrs,
    pub node_attrs: Attrs,
    pub edge_attrs: Attrs,
    pub clusters: Vec<Cluster>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Diagram {
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn cluster(&self, id: ClusterId) -> &Cluster {
        &self.clusters[id.index()]
    }

    /// Number of clusters enclosing `id`, counting itself.
    pub fn cluster_depth(&self, id: ClusterId) -> usize {
        let mut depth = 1;
        let mut current = self.cluster(id).parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.cluster(parent).parent;
        }
        depth
    }

    pub fn child_clusters(&self, parent: Option<ClusterId>) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter().filter(move |c| c.parent == parent)
    }

    pub fn nodes_in(&self, cluster: Option<ClusterId>) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.cluster == cluster)
    }
}

#[cfg(test)]
impl Diagram {
    pub fn nodes_of(&self, kind: NodeKind) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.kind == kind).collect()
    }

    /// Finds an edge joining `a` and `b`. Undirected edges match either way round.
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<&Edge> {
        self.edges
            .iter()
            .find(|e| (e.from == a && e.to == b) || (!e.directed && e.from == b && e.to == a))
    }
}

pub struct DiagramBuilder {
    diagram: Diagram,
    current: Option<ClusterId>,
}

impl DiagramBuilder {
    pub fn new(name: impl Into<String>, filename: impl Into<String>) -> Self {
        DiagramBuilder {
            diagram: Diagram {
                name: name.into(),
                filename: filename.into(),
                direction: Direction::LeftRight,
                graph_attrs: Attrs::default(),
                node_attrs: Attrs::default(),
                edge_attrs: Attrs::default(),
                clusters: Vec::new(),
                nodes: Vec::new(),
                edges: Vec::new(),
            },
            current: None,
        }
    }

    pub fn direction(&mut self, direction: Direction) -> &mut Self {
        self.diagram.direction = direction;
        self
    }

    pub fn graph_attr(&mut self, key: &str, value: &str) -> &mut Self {
        self.diagram.graph_attrs.set(key, value);
        self
    }

    pub fn node_attr(&mut self, key: &str, value: &str) -> &mut Self {
        self.diagram.node_attrs.set(key, value);
        self
    }

    pub fn edge_attr(&mut self, key: &str, value: &str) -> &mut Self {
        self.diagram.edge_attrs.set(key, value);
        self
    }

    /// Adds a node to whichever cluster scope is currently open.
    pub fn node(&mut self, kind: NodeKind, label: impl Into<String>) -> NodeId {
        let id = NodeId(self.diagram.nodes.len());
        self.diagram.nodes.push(Node {
            id,
            kind,
            label: label.into(),
            cluster: self.current,
        });
        id
    }

    /// Opens a cluster nested in the current scope for the duration of `body`.
    pub fn cluster<R, F>(&mut self, label: impl Into<String>, body: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        let id = ClusterId(self.diagram.clusters.len());
        self.diagram.clusters.push(Cluster {
            id,
            label: label.into(),
            parent: self.current,
        });

        let outer = self.current.replace(id);
        let result = body(self);
        self.current = outer;
        result
    }

    /// Directed edge, `from >> to`.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> &mut Edge {
        self.push_edge(from, to, true)
    }

    /// Undirected edge, `from - to`.
    pub fn link(&mut self, from: NodeId, to: NodeId) -> &mut Edge {
        self.push_edge(from, to, false)
    }

    pub fn chain(&mut self, path: &[NodeId]) -> &mut Self {
        for pair in path.windows(2) {
            self.connect(pair[0], pair[1]);
        }
        self
    }

    pub fn build(self) -> Diagram {
        self.diagram
    }

    fn push_edge(&mut self, from: NodeId, to: NodeId, directed: bool) -> &mut Edge {
        self.diagram.edges.push(Edge {
            from,
            to,
            label: None,
            style: None,
            directed,
        });
        let last = self.diagram.edges.len() - 1;
        &mut self.diagram.edges[last]
    }
}
