//! Plain-text sheet summary.
use std::fmt::{self, Write};

use anyhow::Result;
use sheet_core::{AttributeKind, Entity, Unsatisfied};

/// Renders points, attributes (with pool states) and unmet prerequisites.
pub fn render(entity: &Entity) -> Result<String> {
    let missing = entity.unsatisfied_traits()?;
    let mut out = String::new();
    write_sheet(&mut out, entity, &missing)?;
    Ok(out)
}

fn write_sheet(out: &mut String, entity: &Entity, missing: &[Unsatisfied]) -> fmt::Result {
    let profile = &entity.profile;
    let name = if profile.name.is_empty() { "(unnamed)" } else { &profile.name };
    writeln!(out, "{name}  player: {}  TL: {}", profile.player_name, profile.tech_level)?;
    writeln!(
        out,
        "Points: {} total, {} spent, {} unspent",
        entity.total_points,
        entity.spent_points(),
        entity.unspent_points()
    )?;

    writeln!(out, "Attributes:")?;
    let view = entity.attributes();
    for def in entity.defs().list() {
        let Some(attr) = view.attributes().get(def.id()) else {
            continue;
        };
        let cost = view.attribute_cost(attr);
        match def.kind {
            AttributeKind::Pool => {
                let state = view
                    .current_threshold(def.id())
                    .map(|t| format!(" [{}]", t.state))
                    .unwrap_or_default();
                writeln!(
                    out,
                    "  {:<12} {:>6}/{:<6} {:>5} pts{state}",
                    def.name,
                    view.attribute_current(attr),
                    view.attribute_maximum(attr),
                    cost
                )?;
            }
            AttributeKind::Integer | AttributeKind::Decimal => {
                writeln!(
                    out,
                    "  {:<12} {:>13} {:>5} pts",
                    def.name,
                    view.attribute_current(attr),
                    cost
                )?;
            }
        }
    }

    if !missing.is_empty() {
        writeln!(out, "Unsatisfied prerequisites:")?;
        for item in missing {
            writeln!(out, "  {}{}", item.name, item.explanation.replace('\n', "\n    "))?;
        }
    }
    Ok(())
}
