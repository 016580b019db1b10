//! Terminal rendering of prediction reports and errors.

use colored::*;
use hivbind_common::error::{RequestError, StartupError};
use hivbind_molecules::scoring::{BindingStrength, Recommendation};
use hivbind_molecules::PredictionReport;

/// Example CIDs. Drug names are for orientation only.
const EXAMPLE_CIDS: [(&str, &str); 4] = [
    ("92727", "Lopinavir"),
    ("5362440", "Indinavir"),
    ("64143", "Nelfinavir"),
    ("392622", "Ritonavir"),
];

/// Held-out metrics reported when the shipped forest was trained.
/// Informational only; nothing here is derived from the loaded artifacts.
const MODEL_PERFORMANCE: [(&str, &str); 4] = [
    ("Algorithm", "Random Forest Regressor"),
    ("Test R²", "0.866"),
    ("Test RMSE", "0.892 kcal/mol"),
    ("Test MAE", "0.721 kcal/mol"),
];

pub fn banner() -> String {
    let examples: String = EXAMPLE_CIDS
        .iter()
        .map(|(cid, name)| format!("  • {} ({})\n", cid, name))
        .collect();

    format!(
        "{}\n\
         Predicts ΔG of ligands to HIV-1 protease (1HVR) from PubChem properties\n\
         and assesses drug-likeness using Lipinski's Rule of Five.\n\
         \n\
         {}\n\
         {}\n\
         {}\n\
         {}\n\
         {}\n",
        "🧬 HIV-1 Protease Binding Affinity Predictor".blue().bold(),
        "Example CIDs:".bold(),
        examples,
        scale_legend(),
        model_performance(),
        "Enter a PubChem Compound ID (CID), or 'quit' to exit.".dimmed(),
    )
}

pub fn scale_legend() -> String {
    format!(
        "{}\n  ΔG < -9  {}\n  ΔG < -7  {}\n  ΔG ≥ -7  {}\n{}\n",
        "Scale:".bold(),
        "Strong Binding".green(),
        "Moderate Binding".yellow(),
        "Weak Binding".red(),
        "More negative ΔG values indicate stronger binding affinities.".dimmed(),
    )
}

pub fn model_performance() -> String {
    let rows: String = MODEL_PERFORMANCE
        .iter()
        .map(|(metric, value)| format!("  {:<10} {}\n", format!("{}:", metric), value))
        .collect();
    format!("{}\n{}", "Model Performance:".bold(), rows)
}

fn binding_line(binding: BindingStrength) -> ColoredString {
    match binding {
        BindingStrength::Strong => binding.label().green().bold(),
        BindingStrength::Moderate => binding.label().yellow().bold(),
        BindingStrength::Weak => binding.label().red().bold(),
    }
}

fn recommendation_line(recommendation: Recommendation) -> String {
    let text = format!("{} - {}", recommendation.label(), recommendation.explanation());
    match recommendation {
        Recommendation::Excellent => format!("⭐ {}", text.green().bold()),
        Recommendation::NeedsOptimization => format!("⚠️  {}", text.yellow().bold()),
        Recommendation::Moderate => format!("✓ {}", text.cyan().bold()),
        Recommendation::Poor => format!("❌ {}", text.red().bold()),
    }
}

pub fn report(report: &PredictionReport) -> String {
    let props = &report.properties;
    let assessment = &report.assessment;

    let rules: String = assessment
        .rules
        .iter()
        .map(|rule| {
            let mark = if rule.passed { "✅" } else { "❌" };
            format!("  {} {}\n", mark, rule.describe())
        })
        .collect();

    let n = assessment.violations;
    let verdict = if assessment.is_drug_like {
        let plural = if n != 1 { "s" } else { "" };
        format!(
            "  {}\n  This compound has favorable properties for oral bioavailability.\n",
            format!("✅ Drug-like ({} violation{})", n, plural).green().bold()
        )
    } else {
        format!(
            "  {}\n  This compound may have poor oral bioavailability. Consider structural modifications.\n",
            format!("⚠️  Not drug-like ({} violations)", n).yellow().bold()
        )
    };

    let properties = format!(
        "{}\n  Molecular Weight   {:.2} g/mol\n  LogP               {:.2}\n  H-Bond Donors      {}\n  H-Bond Acceptors   {}\n",
        format!("📊 Ligand Properties (CID {})", report.cid).bold(),
        props.molecular_weight,
        props.logp,
        props.hbond_donors,
        props.hbond_acceptors,
    );
    let prediction = format!(
        "{}\n  Predicted ΔG: {:.3} kcal/mol\n  {}\n",
        "🎯 Prediction Result".bold(),
        report.delta_g,
        binding_line(report.binding),
    );
    let drug_likeness = format!(
        "{}\n{}{}",
        "💊 Drug-Likeness Assessment (Lipinski's Rule of Five)".bold(),
        rules,
        verdict,
    );
    let overall = format!(
        "{}\n  {}\n",
        "🏆 Overall Drug Candidate Assessment".bold(),
        recommendation_line(report.recommendation),
    );

    format!(
        "{}\n\n{}\n{}\n{}\n{}\n🔗 View compound on PubChem: {}\n",
        "✅ Ligand properties retrieved successfully!".green(),
        properties,
        prediction,
        drug_likeness,
        overall,
        report.compound_url.underline(),
    )
}

pub fn request_error(err: &RequestError) -> String {
    match err {
        RequestError::EmptyIdentifier => format!("{}\n", format!("⚠️  {}", err).yellow()),
        RequestError::Fetch(_) => format!(
            "{}\n{}\n",
            format!("❌ {}", err).red(),
            "💡 Make sure the CID is valid. Search at https://pubchem.ncbi.nlm.nih.gov/".dimmed()
        ),
        RequestError::Prediction(_) => format!("{}\n", format!("❌ {}", err).red()),
    }
}

pub fn startup_error(err: &StartupError) -> String {
    format!("{}\n", format!("⚠️  {}", err).red().bold())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hivbind_common::error::FetchError;
    use hivbind_common::LigandProperties;
    use hivbind_molecules::admet::assess;

    fn sample(props: LigandProperties, delta_g: f64) -> PredictionReport {
        let assessment = assess(&props);
        PredictionReport {
            cid: "92727".to_string(),
            properties: props,
            delta_g,
            binding: BindingStrength::classify(delta_g),
            recommendation: Recommendation::from_prediction(delta_g, assessment.is_drug_like),
            assessment,
            compound_url: "https://pubchem.ncbi.nlm.nih.gov/compound/92727".to_string(),
        }
    }

    #[test]
    fn test_report_text() {
        colored::control::set_override(false);
        let text = report(&sample(LigandProperties::new(628.8, 5.92, 2, 5), -10.2));

        assert!(text.contains("Molecular Weight   628.80 g/mol"));
        assert!(text.contains("LogP               5.92"));
        assert!(text.contains("Predicted ΔG: -10.200 kcal/mol"));
        assert!(text.contains("Strong Binding"));
        assert!(text.contains("❌ Molecular Weight > 500 Da"));
        assert!(text.contains("✅ Hydrogen Bond Donors ≤ 5"));
        assert!(text.contains("Not drug-like (2 violations)"));
        assert!(text.contains("Promising but needs optimization - Strong binding but poor drug-likeness."));
    }

    #[test]
    fn test_violation_plural() {
        colored::control::set_override(false);
        let one = report(&sample(LigandProperties::new(510.0, 2.0, 1, 4), -8.0));
        assert!(one.contains("Drug-like (1 violation)\n"));
        let none = report(&sample(LigandProperties::new(300.0, 2.0, 1, 4), -9.5));
        assert!(none.contains("Drug-like (0 violations)"));
        assert!(none.contains("Excellent Drug Candidate"));
    }

    #[test]
    fn test_fetch_error_has_hint() {
        colored::control::set_override(false);
        let text = request_error(&RequestError::Fetch(FetchError::Transport("HTTP 404".into())));
        assert!(text.contains("❌ PubChem API error: HTTP 404"));
        assert!(text.contains("Make sure the CID is valid"));
        assert_eq!(request_error(&RequestError::EmptyIdentifier), "⚠️  Please enter a PubChem CID.\n");
    }

    #[test]
    fn test_report_layout() {
        colored::control::set_override(false);
        let text = report(&sample(LigandProperties::new(300.0, 2.0, 1, 4), -9.5));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "✅ Ligand properties retrieved successfully!");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "📊 Ligand Properties (CID 92727)");
        assert_eq!(lines[3], "  Molecular Weight   300.00 g/mol");
        assert_eq!(lines[6], "  H-Bond Acceptors   4");
        assert_eq!(lines[9], "  Predicted ΔG: -9.500 kcal/mol");
        assert_eq!(lines[10], "  Strong Binding");
        assert_eq!(
            lines.last().copied(),
            Some("🔗 View compound on PubChem: https://pubchem.ncbi.nlm.nih.gov/compound/92727")
        );
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_banner_lists_examples_and_model_performance() {
        colored::control::set_override(false);
        let text = banner();
        assert!(text.contains("  • 92727 (Lopinavir)\n"));
        assert!(text.contains("ΔG < -9  Strong Binding"));
        assert!(text.contains("Model Performance:\n"));
        assert!(text.contains("  Algorithm: Random Forest Regressor\n"));
        assert!(text.contains("  Test R²:   0.866\n"));
        assert!(text.contains("  Test RMSE: 0.892 kcal/mol\n"));
        assert!(text.contains("  Test MAE:  0.721 kcal/mol\n"));
        assert!(text.ends_with("'quit' to exit.\n"));
    }
}
