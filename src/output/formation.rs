//! Linear rendering of a train formation.

use colored::Colorize;

use crate::models::{Carriage, Formation};

fn class_label(class_type: u8) -> &'static str {
    match class_type {
        1 => "1.",
        2 => "2.",
        12 => "1./2.",
        _ => "",
    }
}

fn amenity_tags(c: &Carriage) -> Vec<&'static str> {
    let mut tags = Vec::new();
    if c.has_bistro {
        tags.push("bistro");
    }
    if c.has_ac {
        tags.push("AC");
    }
    if c.has_wheelchair_space {
        tags.push("wheelchair");
    }
    if c.has_family_zone {
        tags.push("family");
    }
    if c.has_quiet_zone {
        tags.push("quiet");
    }
    if c.has_bahn_comfort {
        tags.push("comfort");
    }
    tags
}

/// Print a formation: platform sectors, then each group with its carriages
/// in platform order.
pub fn print_formation(formation: &Formation) {
    println!(
        "{} {} {}",
        "Formation".bold(),
        formation.train_type.cyan().bold(),
        formation.train_numbers.join("/").cyan().bold()
    );
    if !formation.platform.is_empty() {
        println!("{} {}", "Platform:".dimmed(), formation.platform);
    }
    if !formation.sectors.is_empty() {
        let names: Vec<&str> = formation.sectors.iter().map(|s| s.name.as_str()).collect();
        println!("{} {}", "Sectors:".dimmed(), names.join(" "));
    }
    println!();

    for group in &formation.groups {
        let mut heading = format!("{} {}", group.train_type, group.train_no);
        if !group.destination.is_empty() {
            heading.push_str(&format!(" → {}", group.destination));
        }
        if !group.model.is_empty() {
            heading.push_str(&format!("  ({})", group.model));
        }
        println!("{}", heading.bold());

        for c in &group.carriages {
            let number = if c.number.is_empty() {
                "--".to_string()
            } else {
                c.number.clone()
            };

            let kind = if c.locomotive {
                "locomotive".to_string()
            } else if c.powercar {
                "powercar".to_string()
            } else {
                let class = class_label(c.class_type);
                if class.is_empty() {
                    c.construction_type.clone()
                } else {
                    format!("{class} class")
                }
            };

            let mut line = format!(
                "  {:>3}  {}  {:<10}",
                number.cyan(),
                if c.sector.is_empty() {
                    " ".to_string()
                } else {
                    c.sector.clone()
                },
                kind
            );

            let tags = amenity_tags(c);
            if !tags.is_empty() {
                line.push_str(&format!("  [{}]", tags.join(", ")));
            }
            if c.closed {
                line.push_str(&format!("  {}", "CLOSED".red().bold()));
            }

            println!("{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_labels() {
        assert_eq!(class_label(1), "1.");
        assert_eq!(class_label(2), "2.");
        assert_eq!(class_label(12), "1./2.");
        assert_eq!(class_label(0), "");
    }
}
