use crate::effectiveness::{
    DefenderProfile, EffectivenessTier, MultiplierVector, Tiers, ALL_TIERS,
};
use crate::i18n::{label, translate_type, Language};
use crate::index::IndexEntry;
use crate::resolver::Unresolved;
use crate::types::{multiplier, Multiplier, Type, ALL_TYPES};
use serde_json::json;
use std::collections::HashMap;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub lang: Language,
    pub color: bool,
}

fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

pub fn type_label(t: Type, opts: RenderOptions) -> String {
    let text = translate_type(t, opts.lang);
    if !opts.color {
        return text;
    }
    match hex_to_rgb(t.color()) {
        Some((r, g, b)) => format!("\x1b[1;38;2;{r};{g};{b}m{text}\x1b[0m"),
        None => text,
    }
}

fn type_list(types: &[Type], opts: RenderOptions) -> String {
    types
        .iter()
        .map(|t| type_label(*t, opts))
        .collect::<Vec<_>>()
        .join("  ")
}

fn push_tier(out: &mut String, heading: &str, types: &[Type], opts: RenderOptions) {
    if types.is_empty() {
        return;
    }
    let _ = writeln!(out, "  {heading:<10} {}", type_list(types, opts));
}

pub fn render_matchup(profile: &DefenderProfile, tiers: &Tiers, opts: RenderOptions) -> String {
    let lang = opts.lang;
    let mut out = String::new();
    let defenders: Vec<Type> = profile.types().collect();
    let defended_by = if defenders.is_empty() {
        "-".to_string()
    } else {
        type_list(&defenders, opts)
    };
    let _ = writeln!(out, "{} {}", label("defended_by", lang), defended_by);
    let _ = writeln!(out);

    let _ = writeln!(out, "{}", label("weaknesses", lang));
    push_tier(&mut out, "x4", tiers.get(EffectivenessTier::Quadruple), opts);
    push_tier(&mut out, "x2", tiers.get(EffectivenessTier::Double), opts);
    let _ = writeln!(out);

    let _ = writeln!(out, "{}", label("resistances", lang));
    let immune = format!("{} x0", label("immune", lang));
    push_tier(&mut out, &immune, tiers.get(EffectivenessTier::Immune), opts);
    push_tier(&mut out, "x0.25", tiers.get(EffectivenessTier::Quarter), opts);
    push_tier(&mut out, "x0.5", tiers.get(EffectivenessTier::Half), opts);
    let _ = writeln!(out);

    let _ = writeln!(out, "{}", label("neutral", lang));
    push_tier(&mut out, "x1", tiers.get(EffectivenessTier::Neutral), opts);
    out
}

pub fn render_detected(types: &[Type], opts: RenderOptions) -> String {
    format!("{} {}", label("detected_types", opts.lang), type_list(types, opts))
}

fn chart_cell(m: Multiplier) -> &'static str {
    match m {
        Multiplier::IMMUNE => "0",
        Multiplier::HALF => "½",
        Multiplier::DOUBLE => "2",
        _ => ".",
    }
}

fn abbreviation(t: Type, lang: Language) -> String {
    translate_type(t, lang).chars().take(3).collect()
}

/// Attacking types as rows, defending types as columns.
pub fn render_chart(opts: RenderOptions) -> String {
    let mut out = String::from("atk\\def");
    for def in ALL_TYPES {
        let _ = write!(out, " {:>3}", abbreviation(def, opts.lang));
    }
    out.push('\n');
    for atk in ALL_TYPES {
        let _ = write!(out, "{:<7}", abbreviation(atk, opts.lang));
        for def in ALL_TYPES {
            let _ = write!(out, " {:>3}", chart_cell(multiplier(atk, def)));
        }
        out.push('\n');
    }
    out
}

/// Per attacking type: how many defender profiles land in each tier, then the
/// number it hits super-effectively and the number that resist it.
pub fn render_histogram(
    histogram: &HashMap<Type, HashMap<EffectivenessTier, usize>>,
    opts: RenderOptions,
) -> String {
    let mut out = format!("{:<10}", "atk");
    for tier in ALL_TIERS {
        let _ = write!(out, " {:>5}", tier.symbol());
    }
    out.push_str("   weak resist\n");
    for atk in ALL_TYPES {
        let Some(counts) = histogram.get(&atk) else {
            continue;
        };
        let _ = write!(out, "{:<10}", translate_type(atk, opts.lang));
        let (mut weak, mut resist) = (0, 0);
        for tier in ALL_TIERS {
            let n = counts.get(&tier).copied().unwrap_or(0);
            if tier.is_weakness() {
                weak += n;
            } else if tier.is_resistance() {
                resist += n;
            }
            let _ = write!(out, " {n:>5}");
        }
        let _ = writeln!(out, "   {weak:>4} {resist:>6}");
    }
    out
}

pub fn render_suggestions(entries: &[IndexEntry], opts: RenderOptions) -> String {
    if entries.is_empty() {
        return format!("{}\n", label("no_suggestions", opts.lang));
    }
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(out, "{:<24} #{}", entry.localized, entry.id);
    }
    out
}

pub fn render_unresolved(reason: &Unresolved, opts: RenderOptions) -> String {
    match reason {
        Unresolved::NotFound(_) | Unresolved::NoKnownTypes(_) | Unresolved::InvalidProfile { .. } => {
            label("not_found", opts.lang)
        }
        Unresolved::Cancelled => label("cancelled", opts.lang),
        Unresolved::Failed(_) => label("network_error", opts.lang),
    }
}

pub fn matchup_json(
    profile: &DefenderProfile,
    vector: &MultiplierVector,
    tiers: &Tiers,
) -> serde_json::Value {
    let defenders: Vec<Type> = profile.types().collect();
    json!({
        "defender": defenders,
        "multipliers": vector,
        "tiers": tiers,
    })
}
