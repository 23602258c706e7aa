//! The AWS three-tier network topology, declared once and parameterized by
//! label language and detail level.

use clap::ValueEnum;

use crate::diagram::{Diagram, DiagramBuilder, Direction, EdgeStyle, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Language {
    En,
    Ja,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Detail {
    Basic,
    Detailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variant {
    pub language: Language,
    pub detail: Detail,
}

impl Variant {
    pub fn new(language: Language, detail: Detail) -> Self {
        Variant { language, detail }
    }

    pub fn all() -> [Variant; 4] {
        [
            Variant::new(Language::En, Detail::Basic),
            Variant::new(Language::Ja, Detail::Basic),
            Variant::new(Language::En, Detail::Detailed),
            Variant::new(Language::Ja, Detail::Detailed),
        ]
    }

    pub fn output_file_name(self) -> &'static str {
        match (self.detail, self.language) {
            (Detail::Basic, Language::En) => "aws_3tier_architecture",
            (Detail::Basic, Language::Ja) => "aws_3tier_architecture_ja",
            (Detail::Detailed, Language::En) => "aws_3tier_detailed_architecture",
            (Detail::Detailed, Language::Ja) => "aws_3tier_detailed_architecture_ja",
        }
    }

    /// The single line printed once `file` has been written.
    pub fn confirmation(self, file: &str) -> String {
        let prefix = match (self.detail, self.language) {
            (Detail::Basic, Language::En) => "Architecture diagram created",
            (Detail::Basic, Language::Ja) => "アーキテクチャ図が作成されました",
            (Detail::Detailed, Language::En) => "Detailed architecture diagram created",
            (Detail::Detailed, Language::Ja) => "詳細なアーキテクチャ図が作成されました",
        };
        format!("{}: {}", prefix, file)
    }

    fn labels(self) -> &'static Labels {
        match (self.detail, self.language) {
            (Detail::Basic, Language::En) => &BASIC_EN,
            (Detail::Basic, Language::Ja) => &BASIC_JA,
            (Detail::Detailed, Language::En) => &DETAILED_EN,
            (Detail::Detailed, Language::Ja) => &DETAILED_JA,
        }
    }
}

/// Labels only the detailed variant draws.
struct DetailLabels {
    user: &'static str,
    db_tier: &'static str,
    edges: EdgeLabels,
}

struct EdgeLabels {
    user_to_igw: &'static str,
    igw_to_route_table: &'static str,
    route_table_to_web_sg: &'static str,
    web_sg_to_web: &'static str,
    web_to_db_sg: &'static str,
    db_sg_to_db: &'static str,
    db_to_subnet: &'static str,
}

struct Labels {
    title: &'static str,
    igw: &'static str,
    vpc: &'static str,
    public_subnet: &'static str,
    route_table: &'static str,
    web_sg: &'static str,
    web: &'static str,
    private_subnet_clusters: [&'static str; 2],
    private_subnets: [&'static str; 2],
    db_sg: &'static str,
    db: &'static str,
    detail: Option<DetailLabels>,
}

const VPC: &str = "VPC (10.0.0.0/16)";

static BASIC_EN: Labels = Labels {
    title: "AWS 3-Tier Architecture",
    igw: "Internet Gateway",
    vpc: VPC,
    public_subnet: "Public Subnet (10.0.1.0/24)\nAvailability Zone A",
    route_table: "Public Route Table",
    web_sg: "Web Security Group",
    web: "Web Server\nt2.micro",
    private_subnet_clusters: [
        "Private Subnet 1 (10.0.2.0/24)\nAvailability Zone B",
        "Private Subnet 2 (10.0.3.0/24)\nAvailability Zone C",
    ],
    private_subnets: ["Private Subnet 1", "Private Subnet 2"],
    db_sg: "Database Security Group",
    db: "MySQL Database\ndb.t3.micro",
    detail: None,
};

static BASIC_JA: Labels = Labels {
    title: "AWS 3層アーキテクチャ",
    igw: "インターネット\nゲートウェイ",
    vpc: VPC,
    public_subnet: "パブリックサブネット (10.0.1.0/24)\nアベイラビリティゾーン A",
    route_table: "パブリック\nルートテーブル",
    web_sg: "Webセキュリティ\nグループ",
    web: "Webサーバー\nt2.micro",
    private_subnet_clusters: [
        "プライベートサブネット1 (10.0.2.0/24)\nアベイラビリティゾーン B",
        "プライベートサブネット2 (10.0.3.0/24)\nアベイラビリティゾーン C",
    ],
    private_subnets: ["プライベート\nサブネット1", "プライベート\nサブネット2"],
    db_sg: "データベース\nセキュリティグループ",
    db: "MySQLデータベース\ndb.t3.micro",
    detail: None,
};

static DETAILED_EN: Labels = Labels {
    title: "AWS 3-Tier Architecture",
    igw: "Internet Gateway",
    vpc: VPC,
    public_subnet: "Public Subnet (10.0.1.0/24)\nAvailability Zone A",
    route_table: "Public Route Table",
    web_sg: "Web Security Group\nPorts: 80, 22",
    web: "Web Server\nt2.micro\nAmazon Linux 2",
    private_subnet_clusters: [
        "Private Subnet 1 (10.0.2.0/24)\nAvailability Zone B",
        "Private Subnet 2 (10.0.3.0/24)\nAvailability Zone C",
    ],
    private_subnets: ["Private Subnet 1", "Private Subnet 2"],
    db_sg: "Database Security Group\nPort: 3306",
    db: "MySQL 8.0 Database\ndb.t3.micro\n10GB Storage",
    detail: Some(DetailLabels {
        user: "User",
        db_tier: "Database Tier - Private Subnets",
        edges: EdgeLabels {
            user_to_igw: "HTTP/SSH",
            igw_to_route_table: "Traffic Flow",
            route_table_to_web_sg: "Routed",
            web_sg_to_web: "Ports 80, 22",
            web_to_db_sg: "MySQL\nPort 3306",
            db_sg_to_db: "Port 3306",
            db_to_subnet: "DB Subnet Group",
        },
    }),
};

static DETAILED_JA: Labels = Labels {
    title: "AWS 3層アーキテクチャ",
    igw: "インターネット\nゲートウェイ",
    vpc: VPC,
    public_subnet: "パブリックサブネット (10.0.1.0/24)\nアベイラビリティゾーン A",
    route_table: "パブリック\nルートテーブル",
    web_sg: "Webセキュリティグループ\nポート: 80, 22",
    web: "Webサーバー\nt2.micro\nAmazon Linux 2",
    private_subnet_clusters: [
        "プライベートサブネット1 (10.0.2.0/24)\nアベイラビリティゾーン B",
        "プライベートサブネット2 (10.0.3.0/24)\nアベイラビリティゾーン C",
    ],
    private_subnets: ["プライベート\nサブネット1", "プライベート\nサブネット2"],
    db_sg: "データベースセキュリティグループ\nポート: 3306",
    db: "MySQL 8.0 データベース\ndb.t3.micro\n10GBストレージ",
    detail: Some(DetailLabels {
        user: "ユーザー",
        db_tier: "データベース層 - プライベートサブネット",
        edges: EdgeLabels {
            user_to_igw: "HTTP/SSH",
            igw_to_route_table: "トラフィックフロー",
            route_table_to_web_sg: "ルーティング",
            web_sg_to_web: "ポート: 80, 22",
            web_to_db_sg: "MySQL\nポート3306",
            db_sg_to_db: "ポート: 3306",
            db_to_subnet: "DBサブネットグループ",
        },
    }),
};

pub fn build(variant: Variant) -> Diagram {
    let labels = variant.labels();
    let detail = labels.detail.as_ref();

    let mut b = DiagramBuilder::new(labels.title, variant.output_file_name());
    b.direction(Direction::TopBottom);
    if detail.is_some() {
        b.graph_attr("fontsize", "20")
            .graph_attr("bgcolor", "white")
            .graph_attr("pad", "0.5")
            .node_attr("fontsize", "14")
            .node_attr("fontcolor", "#333333")
            .edge_attr("fontsize", "12");
    }

    let user = detail.map(|d| b.node(NodeKind::User, d.user));
    let igw = b.node(NodeKind::InternetGateway, labels.igw);

    let (public, private, database) = b.cluster(labels.vpc, |b| {
        let public = b.cluster(labels.public_subnet, |b| {
            let route_table = b.node(NodeKind::RouteTable, labels.route_table);
            let web_sg = b.node(NodeKind::SecurityBoundary, labels.web_sg);
            let web = b.node(NodeKind::Compute, labels.web);
            (route_table, web_sg, web)
        });

        let data_tier = |b: &mut DiagramBuilder| {
            let subnets = [0, 1].map(|i| {
                b.cluster(labels.private_subnet_clusters[i], |b| {
                    b.node(NodeKind::PrivateSubnet, labels.private_subnets[i])
                })
            });
            let db_sg = b.node(NodeKind::SecurityBoundary, labels.db_sg);
            let db = b.node(NodeKind::Database, labels.db);
            (subnets, (db_sg, db))
        };
        let (private, database) = match detail {
            Some(d) => b.cluster(d.db_tier, data_tier),
            None => data_tier(b),
        };
        (public, private, database)
    });
    let (route_table, web_sg, web) = public;
    let [subnet1, subnet2] = private;
    let (db_sg, db) = database;

    match (detail, user) {
        (Some(d), Some(user)) => {
            let edges = &d.edges;
            b.connect(user, igw).labeled(edges.user_to_igw);
            b.connect(igw, route_table).labeled(edges.igw_to_route_table);
            b.connect(route_table, web_sg).labeled(edges.route_table_to_web_sg);
            b.connect(web_sg, web).labeled(edges.web_sg_to_web);
            b.connect(web, db_sg).labeled(edges.web_to_db_sg);
            b.connect(db_sg, db).labeled(edges.db_sg_to_db);
            for subnet in [subnet1, subnet2] {
                b.link(db, subnet)
                    .labeled(edges.db_to_subnet)
                    .styled(EdgeStyle::Dashed);
            }
        }
        _ => {
            b.chain(&[igw, route_table, web_sg, web]);
            b.chain(&[web, db_sg, db]);
            b.link(db, subnet1);
            b.link(db, subnet2);
        }
    }

    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::{Node, NodeId};

    fn only(d: &Diagram, kind: NodeKind) -> NodeId {
        let nodes = d.nodes_of(kind);
        assert_eq!(nodes.len(), 1, "expected one {:?}", kind);
        nodes[0].id
    }

    fn security_boundaries(d: &Diagram) -> (NodeId, NodeId) {
        let sgs: Vec<&Node> = d.nodes_of(NodeKind::SecurityBoundary);
        assert_eq!(sgs.len(), 2);
        // web SG is declared before the database SG
        (sgs[0].id, sgs[1].id)
    }

    fn shape(d: &Diagram) -> Vec<(NodeKind, Option<usize>)> {
        d.nodes
            .iter()
            .map(|n| (n.kind, n.cluster.map(|c| d.cluster_depth(c))))
            .collect()
    }

    #[test]
    fn test_node_counts_per_variant() {
        for variant in Variant::all() {
            let d = build(variant);
            only(&d, NodeKind::InternetGateway);
            only(&d, NodeKind::RouteTable);
            only(&d, NodeKind::Compute);
            only(&d, NodeKind::Database);
            assert_eq!(d.nodes_of(NodeKind::SecurityBoundary).len(), 2);
            assert_eq!(d.nodes_of(NodeKind::PrivateSubnet).len(), 2);
            let users = d.nodes_of(NodeKind::User).len();
            assert_eq!(users, usize::from(variant.detail == Detail::Detailed));
        }
    }

    #[test]
    fn test_request_path_is_unbroken_chain() {
        for variant in Variant::all() {
            let d = build(variant);
            let igw = only(&d, NodeKind::InternetGateway);
            let rt = only(&d, NodeKind::RouteTable);
            let web = only(&d, NodeKind::Compute);
            let db = only(&d, NodeKind::Database);
            let (web_sg, db_sg) = security_boundaries(&d);

            for (from, to) in [(igw, rt), (rt, web_sg), (web_sg, web), (web, db_sg), (db_sg, db)] {
                let edge = d
                    .edge_between(from, to)
                    .unwrap_or_else(|| panic!("{:?}: missing {:?} -> {:?}", variant, from, to));
                assert!(edge.directed);
            }
        }
    }

    #[test]
    fn test_database_links_to_both_subnets() {
        for variant in Variant::all() {
            let d = build(variant);
            let db = only(&d, NodeKind::Database);
            for subnet in d.nodes_of(NodeKind::PrivateSubnet) {
                let edge = d.edge_between(subnet.id, db).expect("db subnet link");
                assert!(!edge.directed);
                if variant.detail == Detail::Detailed {
                    assert_eq!(edge.style, Some(EdgeStyle::Dashed));
                }
            }
        }
    }

    #[test]
    fn test_detailed_user_edge_and_labels() {
        for language in [Language::En, Language::Ja] {
            let d = build(Variant::new(language, Detail::Detailed));
            let user = only(&d, NodeKind::User);
            let igw = only(&d, NodeKind::InternetGateway);
            let edge = d.edge_between(user, igw).expect("user -> gateway");
            assert_eq!(edge.label.as_deref(), Some("HTTP/SSH"));
            assert_eq!(d.node(user).cluster, None);

            assert!(d
                .edges
                .iter()
                .all(|e| e.label.as_deref().is_some_and(|l| !l.is_empty())));
            assert_eq!(d.graph_attrs.get("bgcolor"), Some("white"));
            assert_eq!(d.node_attrs.get("fontcolor"), Some("#333333"));
            assert_eq!(d.edge_attrs.get("fontsize"), Some("12"));
        }
    }

    #[test]
    fn test_basic_variant_has_no_labels_or_styling() {
        let d = build(Variant::new(Language::En, Detail::Basic));
        assert!(d.edges.iter().all(|e| e.label.is_none() && e.style.is_none()));
        assert!(d.graph_attrs.is_empty());
        assert_eq!(d.direction, Direction::TopBottom);
    }

    #[test]
    fn test_detailed_nests_data_tier_one_level_deeper() {
        let basic = build(Variant::new(Language::En, Detail::Basic));
        let detailed = build(Variant::new(Language::En, Detail::Detailed));

        let db_depth = |d: &Diagram| {
            let db = d.node(only(d, NodeKind::Database));
            d.cluster_depth(db.cluster.expect("database inside VPC"))
        };
        assert_eq!(db_depth(&basic), 1);
        assert_eq!(db_depth(&detailed), 2);
        assert_eq!(basic.clusters.len(), 4);
        assert_eq!(detailed.clusters.len(), 5);
    }

    #[test]
    fn test_localized_variants_share_shape() {
        for detail in [Detail::Basic, Detail::Detailed] {
            let en = build(Variant::new(Language::En, detail));
            let ja = build(Variant::new(Language::Ja, detail));
            assert_eq!(shape(&en), shape(&ja));
            assert_eq!(en.edges.len(), ja.edges.len());
            for (a, b) in en.edges.iter().zip(&ja.edges) {
                assert_eq!(
                    (a.from, a.to, a.directed, a.style),
                    (b.from, b.to, b.directed, b.style)
                );
            }
            assert_ne!(en.nodes[0].label, ja.nodes[0].label);
        }
    }

    #[test]
    fn test_detail_labels_only_on_detailed_tables() {
        for variant in Variant::all() {
            let detailed = variant.detail == Detail::Detailed;
            assert_eq!(variant.labels().detail.is_some(), detailed);
            let d = build(variant);
            let tier = d.clusters.iter().any(|c| c.label.contains("Database Tier"))
                || d.clusters.iter().any(|c| c.label.contains("データベース層"));
            assert_eq!(tier, detailed);
        }
    }

    #[test]
    fn test_build_is_repeatable() {
        for variant in Variant::all() {
            assert_eq!(build(variant), build(variant));
        }
    }

    #[test]
    fn test_output_names_and_confirmation() {
        let names: Vec<_> = Variant::all().iter().map(|v| v.output_file_name()).collect();
        assert_eq!(
            names,
            [
                "aws_3tier_architecture",
                "aws_3tier_architecture_ja",
                "aws_3tier_detailed_architecture",
                "aws_3tier_detailed_architecture_ja",
            ]
        );
        let v = Variant::new(Language::Ja, Detail::Detailed);
        assert_eq!(
            v.confirmation("aws_3tier_detailed_architecture_ja.png"),
            "詳細なアーキテクチャ図が作成されました: aws_3tier_detailed_architecture_ja.png"
        );
        assert_eq!(build(v).filename, v.output_file_name());
    }
}
