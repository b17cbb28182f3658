use crate::config::LayoutOptions;
use crate::ir::PersonId;
use crate::layout::{LayoutNode, bounding_box, find_overlaps};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub root_id: Option<PersonId>,
    pub card_width: f32,
    pub card_height: f32,
    pub bounds: Option<BoundsDump>,
    pub overlaps: Vec<[PersonId; 2]>,
    pub nodes: Vec<NodeDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundsDump {
    pub min_x: i32,
    pub min_y: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub id: PersonId,
    pub name: String,
    pub birth_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub death_date: Option<String>,
    pub badge: String,
    pub badge_label: String,
    pub x: i32,
    pub y: i32,
    pub level: i32,
    pub mate_id: Option<PersonId>,
}

impl LayoutDump {
    /// Nodes come out sorted by level, then x, then id.
    pub fn from_layout(nodes: &[LayoutNode<'_>], options: &LayoutOptions) -> Self {
        let mut sorted: Vec<&LayoutNode<'_>> = nodes.iter().collect();
        sorted.sort_by_key(|node| (node.level, node.x, node.id));

        let nodes_dump = sorted
            .iter()
            .map(|node| NodeDump {
                id: node.id,
                name: node.person.display_name(),
                birth_date: node.person.birth_date.clone(),
                death_date: node
                    .person
                    .died_on()
                    .map(|date| date.format("%d.%m.%Y").to_string()),
                badge: node.badge.code().to_string(),
                badge_label: node.badge_label.to_string(),
                x: node.x,
                y: node.y,
                level: node.level,
                mate_id: node.mate_id,
            })
            .collect();

        let bounds = bounding_box(nodes, options).map(|(min_x, min_y, max_x, max_y)| BoundsDump {
            min_x,
            min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        });

        LayoutDump {
            root_id: options.root_id,
            card_width: options.card_width,
            card_height: options.card_height,
            bounds,
            overlaps: find_overlaps(nodes, options)
                .into_iter()
                .map(|(a, b)| [a, b])
                .collect(),
            nodes: nodes_dump,
        }
    }

    /// Per-generation listing, top generation first.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let mut current_level = None;
        for node in &self.nodes {
            if current_level != Some(node.level) {
                current_level = Some(node.level);
                let title = match node.level {
                    0 => "ROOT".to_string(),
                    level if level > 0 => format!("DESCENDANTS ({level})"),
                    level => format!("ANCESTORS ({})", -level),
                };
                out.push_str(&format!("--- {title} ---\n"));
            }
            out.push_str(&format!("#{} {}\n", node.id, node.name));
            out.push_str(&format!("  position: ({}, {})\n", node.x, node.y));
            out.push_str(&format!("  badge: {} ({})", node.badge_label, node.badge));
            if let Some(mate) = node.mate_id {
                out.push_str(&format!(", mate #{mate}"));
            }
            out.push('\n');
            if let Some(born) = &node.birth_date {
                out.push_str(&format!("  born: {born}\n"));
            }
            if let Some(died) = &node.death_date {
                out.push_str(&format!("  died: {died}\n"));
            }
        }
        let levels: Vec<i32> = {
            let mut levels: Vec<i32> = self.nodes.iter().map(|node| node.level).collect();
            levels.dedup();
            levels
        };
        out.push_str(&format!(
            "=== {} people across {} generations ===\n",
            self.nodes.len(),
            levels.len()
        ));
        if self.overlaps.is_empty() {
            out.push_str("no overlapping cards\n");
        } else {
            for [a, b] in &self.overlaps {
                out.push_str(&format!("OVERLAP: #{a} and #{b}\n"));
            }
        }
        out
    }
}

pub fn write_layout_dump(
    path: Option<&Path>,
    nodes: &[LayoutNode<'_>],
    options: &LayoutOptions,
) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(nodes, options);
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &dump)?;
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, &dump)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
