//! Quick query templates by practice area.

/// A fill-in-the-blanks research query.
#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub label: &'static str,
    pub text: &'static str,
}

pub const TEMPLATES: &[Template] = &[
    Template {
        label: "Criminal",
        text: "Client charged with [offense] under [section] of Crimes Act. Previous convictions: [details]. Seeking advice on [plea/bail/sentencing].",
    },
    Template {
        label: "Family",
        text: "Divorce proceedings involving [children/property]. Issues: [custody/assets]. Seeking advice on [specific matter].",
    },
    Template {
        label: "Property",
        text: "Property dispute regarding [address]. Issue: [boundary/easement/sale]. Parties: [details].",
    },
    Template { label: "Commercial", text: "Contract dispute between [parties]. Amount: $[value]. Issue: [breach type]." },
];

/// Print all query templates.
pub fn print_templates() {
    println!("Quick templates (replace the bracketed parts):");
    for t in TEMPLATES {
        println!("\n── {} ──", t.label);
        println!("  {}", t.text);
    }
    println!();
    println!("Usage:");
    println!("  ./legal-eagle --query \"Client charged with aggravated burglary under s77 Crimes Act 1958 (Vic). ...\"");
}
