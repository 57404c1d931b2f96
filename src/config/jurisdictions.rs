//! Australian jurisdictions, their AustLII codes and principal criminal/traffic acts.

use serde::Serialize;

use crate::error::ConfigError;

/// Principal acts consulted for a jurisdiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Acts {
    pub crimes: &'static str,
    pub traffic: &'static str,
    pub bail: &'static str,
    pub sentencing: &'static str,
}

/// An Australian jurisdiction as understood by AustLII.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Jurisdiction {
    pub name: &'static str,
    pub code: &'static str,
    pub acts: Acts,
}

/// All jurisdictions in display order.
pub const JURISDICTIONS: &[Jurisdiction] = &[
    Jurisdiction {
        name: "Commonwealth",
        code: "cth",
        acts: Acts {
            crimes: "Criminal Code Act 1995 (Cth)",
            traffic: "N/A",
            bail: "Crimes Act 1914 (Cth)",
            sentencing: "Crimes Act 1914 (Cth)",
        },
    },
    Jurisdiction {
        name: "ACT",
        code: "act",
        acts: Acts {
            crimes: "Crimes Act 1900 (ACT)",
            traffic: "Road Transport (Safety and Traffic Management) Act 1999 (ACT)",
            bail: "Bail Act 1992 (ACT)",
            sentencing: "Crimes (Sentencing) Act 2005 (ACT)",
        },
    },
    Jurisdiction {
        name: "New South Wales",
        code: "nsw",
        acts: Acts {
            crimes: "Crimes Act 1900 (NSW)",
            traffic: "Road Transport Act 2013 (NSW)",
            bail: "Bail Act 2013 (NSW)",
            sentencing: "Crimes (Sentencing Procedure) Act 1999 (NSW)",
        },
    },
    Jurisdiction {
        name: "Northern Territory",
        code: "nt",
        acts: Acts {
            crimes: "Criminal Code Act 1983 (NT)",
            traffic: "Traffic Act 1987 (NT)",
            bail: "Bail Act 1982 (NT)",
            sentencing: "Sentencing Act 1995 (NT)",
        },
    },
    Jurisdiction {
        name: "Queensland",
        code: "qld",
        acts: Acts {
            crimes: "Criminal Code Act 1899 (Qld)",
            traffic: "Transport Operations (Road Use Management) Act 1995 (Qld)",
            bail: "Bail Act 1980 (Qld)",
            sentencing: "Penalties and Sentences Act 1992 (Qld)",
        },
    },
    Jurisdiction {
        name: "South Australia",
        code: "sa",
        acts: Acts {
            crimes: "Criminal Law Consolidation Act 1935 (SA)",
            traffic: "Road Traffic Act 1961 (SA)",
            bail: "Bail Act 1985 (SA)",
            sentencing: "Criminal Law (Sentencing) Act 1988 (SA)",
        },
    },
    Jurisdiction {
        name: "Tasmania",
        code: "tas",
        acts: Acts {
            crimes: "Criminal Code Act 1924 (Tas)",
            traffic: "Road Safety (Alcohol and Drugs) Act 1970 (Tas)",
            bail: "Bail Act 1994 (Tas)",
            sentencing: "Sentencing Act 1997 (Tas)",
        },
    },
    Jurisdiction {
        name: "Victoria",
        code: "vic",
        acts: Acts {
            crimes: "Crimes Act 1958 (Vic)",
            traffic: "Road Safety Act 1986 (Vic)",
            bail: "Bail Act 1977 (Vic)",
            sentencing: "Sentencing Act 1991 (Vic)",
        },
    },
    Jurisdiction {
        name: "Western Australia",
        code: "wa",
        acts: Acts {
            crimes: "Criminal Code Act Compilation Act 1913 (WA)",
            traffic: "Road Traffic Act 1974 (WA)",
            bail: "Bail Act 1982 (WA)",
            sentencing: "Sentencing Act 1995 (WA)",
        },
    },
];

/// Look up a jurisdiction by display name or AustLII code, ignoring case.
pub fn get_jurisdiction(name: &str) -> Option<&'static Jurisdiction> {
    let name = name.trim();
    JURISDICTIONS.iter().find(|j| j.name.eq_ignore_ascii_case(name) || j.code.eq_ignore_ascii_case(name))
}

/// Clap value parser for `--jurisdiction`.
pub fn parse_jurisdiction(s: &str) -> Result<&'static Jurisdiction, ConfigError> {
    get_jurisdiction(s).ok_or_else(|| ConfigError::UnknownJurisdiction(s.to_string()))
}

/// Print all jurisdictions with their codes and acts.
pub fn print_jurisdictions() {
    println!("═══════════════════════════════════════════════════════════════════");
    println!("  Legal Eagle - {} Australian Jurisdictions", JURISDICTIONS.len());
    println!("═══════════════════════════════════════════════════════════════════");

    for j in JURISDICTIONS {
        println!("\n── {} ({}) ──", j.name, j.code);
        println!("  {:<12} {}", "Crimes:", j.acts.crimes);
        println!("  {:<12} {}", "Traffic:", j.acts.traffic);
        println!("  {:<12} {}", "Bail:", j.acts.bail);
        println!("  {:<12} {}", "Sentencing:", j.acts.sentencing);
    }

    println!("\n{}\n", "─".repeat(70));
    println!("Default: Victoria (vic)");
    println!();
    println!("Usage:");
    println!("  ./legal-eagle --jurisdiction nsw");
    println!("  ./legal-eagle --jurisdiction \"Western Australia\"");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name_and_code() {
        assert_eq!(get_jurisdiction("Victoria").map(|j| j.code), Some("vic"));
        assert_eq!(get_jurisdiction("new south wales").map(|j| j.code), Some("nsw"));
        assert_eq!(get_jurisdiction("QLD").map(|j| j.name), Some("Queensland"));
        assert_eq!(get_jurisdiction(" act ").map(|j| j.name), Some("ACT"));
        assert!(get_jurisdiction("Auckland").is_none());
    }

    #[test]
    fn test_parse_unknown_jurisdiction() {
        let err = parse_jurisdiction("Narnia").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownJurisdiction(ref s) if s == "Narnia"));
    }

    #[test]
    fn test_codes_are_unique() {
        for (i, a) in JURISDICTIONS.iter().enumerate() {
            assert!(JURISDICTIONS[i + 1..].iter().all(|b| b.code != a.code), "duplicate code {}", a.code);
        }
    }
}
