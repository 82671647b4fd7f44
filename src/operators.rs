//! Railway operator lookup by upstream administration id.
//!
//! The journey endpoint tags each stop with an administration id; the most
//! common id across a journey identifies the operating company. Numeric ids
//! follow the UIC country/company numbering; a few non-UIC ids (open-access
//! operators) appear verbatim.

pub struct Operator {
    pub abbr: &'static str,
    pub name: &'static str,
}

const OPERATORS: &[(&str, Operator)] = &[
    (
        "80",
        Operator {
            abbr: "DB",
            name: "DB Fernverkehr AG",
        },
    ),
    (
        "81",
        Operator {
            abbr: "ÖBB",
            name: "Österreichische Bundesbahnen",
        },
    ),
    (
        "82",
        Operator {
            abbr: "CFL",
            name: "Société Nationale des Chemins de Fer Luxembourgeois",
        },
    ),
    (
        "83",
        Operator {
            abbr: "FS",
            name: "Trenitalia",
        },
    ),
    (
        "84",
        Operator {
            abbr: "NS",
            name: "Nederlandse Spoorwegen",
        },
    ),
    ("85", Operator { abbr: "SBB", name: "SBB" }),
    (
        "86",
        Operator {
            abbr: "DSB",
            name: "Danske Statsbaner",
        },
    ),
    (
        "87",
        Operator {
            abbr: "SNCF",
            name: "SNCF",
        },
    ),
    (
        "88",
        Operator {
            abbr: "SNCB",
            name: "SNCB/NMBS",
        },
    ),
    (
        "FLX10",
        Operator {
            abbr: "FLX",
            name: "FlixTrain",
        },
    ),
];

/// Look up an operator by administration id.
pub fn operator(admin_id: &str) -> Option<&'static Operator> {
    OPERATORS
        .iter()
        .find(|(id, _)| *id == admin_id)
        .map(|(_, op)| op)
}

/// Operator display name for an administration id, if known.
pub fn operator_name(admin_id: &str) -> Option<&'static str> {
    operator(admin_id).map(|op| op.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_operators() {
        assert_eq!(operator("80").unwrap().abbr, "DB");
        assert_eq!(operator("80").unwrap().name, "DB Fernverkehr AG");
        assert_eq!(operator("85").unwrap().name, "SBB");
        assert_eq!(operator("81").unwrap().name, "Österreichische Bundesbahnen");
        assert_eq!(operator("FLX10").unwrap().name, "FlixTrain");
    }

    #[test]
    fn unknown_operator_is_none() {
        assert!(operator("UNKNOWN_ID").is_none());
        assert!(operator_name("").is_none());
    }
}
