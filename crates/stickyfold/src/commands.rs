use std::error::Error;

use colored::Colorize;
use log::info;
use serde::Serialize;
use sf_complex::binding_occurs;
use sf_complex::random_sequence;
use sf_complex::seeded_rng;
use sf_complex::Assembler;
use sf_complex::AssemblyConfig;
use sf_complex::Complex;
use sf_complex::ComplexError;
use sf_complex::ComplexMfe;
use sf_complex::Composer;
use sf_complex::MfeEngine;
use sf_complex::StrandRegistry;
use sf_complex::SuboptEnsemble;
use sf_complex::subopt_window;
use sf_energy::normalize_strand;
use sf_energy::FoldMode;
use sf_energy::FoldingOracle;
use sf_energy::NearestNeighborModel;
use sf_structure::BoundaryMode;
use sf_structure::Constraint;
use sf_structure::ConstraintSite;
use sf_structure::DotBracketVec;

use crate::cli::BindArguments;
use crate::cli::SuboptArguments;

/// Strands used by `bind` when none are given.
pub const DEMO_SEQUENCES: [&str; 3] = [
    "AUAUAAUUUGGGGGAUAUACCCCCCGGGGGGG",
    "CCCCCCCCCGGGGGAUAUACCCCCCUUUUUU",
    "AAAAAAAAAGGGGGAUAUACCCCCCU",
];

#[derive(Debug, Serialize)]
pub struct StrandReport {
    pub name: String,
    pub sequence: String,
    pub structure: DotBracketVec,
    pub mfe: f64,
}

#[derive(Debug, Serialize)]
pub struct ComplexReport {
    pub label: String,
    pub sequence: String,
    pub constraint: Constraint,
    pub mfe: ComplexMfe,
    pub binding_energy: Option<f64>,
    pub ensemble: Option<SuboptEnsemble>,
}

impl ComplexReport {
    pub fn binds(&self) -> bool {
        self.binding_energy.is_some_and(binding_occurs)
    }

    /// The structure the next strand binds to: the best member of the
    /// ensemble if there is one, otherwise the MFE structure.
    fn chosen_structure(&self) -> Option<DotBracketVec> {
        let best = self.ensemble.as_ref().and_then(|e| e.best()).map(|s| s.structure.clone());
        best.or_else(|| self.mfe.favorable().map(|m| m.structure().clone()))
    }
}

#[derive(Debug, Serialize)]
pub struct BindReport {
    pub temperature: f64,
    pub strands: Vec<StrandReport>,
    pub pairwise: Vec<ComplexReport>,
    pub cumulative: Vec<ComplexReport>,
}

/// Settings of one `bind` run.
#[derive(Debug, Clone)]
pub struct BindSettings {
    pub assembly: AssemblyConfig,
    pub extend_mode: BoundaryMode,
    pub show_ensemble: bool,
}

impl From<&BindArguments> for BindSettings {
    fn from(args: &BindArguments) -> Self {
        BindSettings {
            assembly: AssemblyConfig { outward_faces: args.outward_faces, ..Default::default() },
            extend_mode: if args.soft_extend { BoundaryMode::Soft } else { BoundaryMode::Hard },
            show_ensemble: args.show_ensemble,
        }
    }
}

pub fn input_sequences(args: &BindArguments) -> Vec<String> {
    if let Some(length) = args.random {
        let seed = args.seed.unwrap_or_else(rand::random);
        info!("random sequences with seed {seed}");
        let mut rng = seeded_rng(seed);
        return (0..args.count).map(|_| random_sequence(&mut rng, length)).collect();
    }
    if args.sequences.is_empty() {
        return DEMO_SEQUENCES.iter().map(|s| s.to_string()).collect();
    }
    args.sequences.clone()
}

fn evaluate<O: FoldingOracle + ?Sized>(
    engine: &MfeEngine<O>,
    label: String,
    complex: &Complex,
    components: &[f64],
    show_ensemble: bool,
) -> Result<ComplexReport, ComplexError> {
    let (mfe, ensemble) = if show_ensemble {
        let eval = engine.evaluate(complex)?;
        (eval.mfe, eval.ensemble)
    } else {
        (engine.compute_mfe(complex)?, None)
    };
    Ok(ComplexReport {
        label,
        sequence: complex.sequence().to_string(),
        constraint: complex.constraint().clone(),
        binding_energy: mfe.binding_energy(components),
        mfe,
        ensemble,
    })
}

/// Fold all strands, bind consecutive pairs, then grow one complex.
/// Growth stops at the first complex without a favorable structure.
pub fn bind<O: FoldingOracle + ?Sized>(
    engine: &MfeEngine<O>,
    sequences: &[String],
    settings: &BindSettings,
) -> Result<BindReport, ComplexError> {
    if sequences.len() < 2 {
        return Err(ComplexError::TooFewStrands(sequences.len()));
    }
    let mut registry = StrandRegistry::new();
    let mut strands = Vec::new();
    let mut reports = Vec::new();
    for seq in sequences {
        let strand = registry.intern(seq, None)?;
        let fold = strand.fold(engine.oracle(), engine.model())?;
        let name = registry.get_name(&strand).unwrap_or_default().to_string();
        reports.push(StrandReport {
            name,
            sequence: strand.sequence().to_string(),
            structure: fold.structure().clone(),
            mfe: fold.mfe(),
        });
        strands.push(strand);
    }

    let assembler = Assembler::new(settings.assembly);
    let mut pairwise = Vec::new();
    for (i, pair) in strands.windows(2).enumerate() {
        let complex = assembler.assemble(pair)?;
        let label = format!("({}+{})", reports[i].name, reports[i + 1].name);
        let components = [reports[i].mfe, reports[i + 1].mfe];
        pairwise.push(evaluate(engine, label, &complex, &components, settings.show_ensemble)?);
    }

    let composer = Composer::new(settings.extend_mode).with_max_length(settings.assembly.max_length);
    let mut cumulative = Vec::new();
    let mut current: Complex = assembler.assemble(&strands[..2])?;
    let mut label = pairwise[0].label.clone();
    let mut chosen = pairwise[0].chosen_structure();
    let mut energy = pairwise[0].mfe.energy();
    for (k, strand) in strands.iter().enumerate().skip(2) {
        let (Some(structure), Some(prev)) = (chosen, energy) else {
            info!("{label} has no favorable structure, stop growing");
            break;
        };
        let next = composer.extend(current.strands(), &structure, strand)?;
        label = format!("({}+{})", label, reports[k].name);
        let report = evaluate(engine, label.clone(), &next,
            &[prev, reports[k].mfe], settings.show_ensemble)?;
        chosen = report.chosen_structure();
        energy = report.mfe.energy();
        cumulative.push(report);
        current = next;
    }

    Ok(BindReport {
        temperature: engine.model().temperature,
        strands: reports,
        pairwise,
        cumulative,
    })
}

fn print_complex(report: &ComplexReport) {
    println!("{}", format!("complex {}:", report.label).bold());
    println!("{}", report.sequence);
    match &report.mfe {
        ComplexMfe::Favorable(m) => println!("{} [{:.2}]", m.structure(), m.energy()),
        ComplexMfe::NoFavorableStructure => println!("{}", "no favorable structure".yellow()),
    }
    if let Some(be) = report.binding_energy {
        println!("binding energy: {be:.2}");
    }
    if report.binds() {
        println!("Based on energies the binding {}.", "does occur".green());
    } else {
        println!("Based on energies the binding {}.", "does not occur".red());
    }
    if let Some(ensemble) = &report.ensemble {
        println!("{} structures within {:.2} kcal/mol:", ensemble.len(),
            ensemble.delta() as f64 / 100.0);
        for s in ensemble.iter() {
            println!("{}\t{:.2}", s.structure, s.energy);
        }
    }
}

pub fn run_bind(args: &BindArguments) -> Result<(), Box<dyn Error>> {
    let oracle = NearestNeighborModel::new().with_subopt_limit(args.subopt_limit);
    let engine = MfeEngine::new(&oracle, args.energy.model());
    let report = bind(&engine, &input_sequences(args), &BindSettings::from(args))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    for s in &report.strands {
        println!("{} {} {} ({:.2})", s.name.bold(), s.sequence, s.structure, s.mfe);
    }
    for c in report.pairwise.iter().chain(&report.cumulative) {
        println!();
        print_complex(c);
    }
    Ok(())
}

pub fn run_subopt(args: &SuboptArguments) -> Result<(), Box<dyn Error>> {
    let sequence = normalize_strand(&args.sequence)?;
    let oracle = match args.subopt_limit {
        Some(n) => NearestNeighborModel::new().with_subopt_limit(n),
        None => NearestNeighborModel::new(),
    };
    let constraint = Constraint::new(vec![ConstraintSite::free(); sequence.len()]);
    let mut fc = oracle.fold_constrained(&sequence, &constraint, FoldMode::Single,
        &args.energy.model())?;
    let (mfe, structure) = fc.mfe()?;
    println!("{}", sequence);
    println!("{} ({:.2})", structure, mfe);
    for s in fc.subopt(subopt_window(mfe), true)? {
        println!("{}\t{:.2}", s.structure, s.energy);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use sf_energy::ModelDetails;

    use crate::cli::Cli;
    use crate::cli::Command;

    fn bind_args(argv: &[&str]) -> BindArguments {
        let cli = Cli::try_parse_from(argv).unwrap();
        let Command::Bind(args) = cli.command else { panic!("expected bind") };
        args
    }

    #[test]
    fn test_input_sequences() {
        let args = bind_args(&["stickyfold", "bind"]);
        assert_eq!(input_sequences(&args), DEMO_SEQUENCES.to_vec());

        let args = bind_args(&["stickyfold", "bind", "--random", "12", "--count", "4",
            "--seed", "3"]);
        let seqs = input_sequences(&args);
        assert_eq!(seqs.len(), 4);
        assert!(seqs.iter().all(|s| s.len() == 12));
        assert_eq!(seqs, input_sequences(&args));
    }

    #[test]
    fn test_bind_three_strands() {
        let nn = NearestNeighborModel::new();
        let engine = MfeEngine::new(&nn, ModelDetails::default());
        let args = bind_args(&["stickyfold", "bind", "--show-ensemble"]);
        let seqs: Vec<String> = ["GGGG", "CCCC", "AGGG"].iter().map(|s| s.to_string()).collect();
        let report = bind(&engine, &seqs, &BindSettings::from(&args)).unwrap();

        assert_eq!(report.strands.len(), 3);
        assert_eq!(report.strands[0].name, "s0");
        assert_eq!(report.pairwise.len(), 2);

        let duplex = &report.pairwise[0];
        assert_eq!(duplex.label, "(s0+s1)");
        assert_eq!(duplex.binding_energy, Some(-5.69));
        assert!(duplex.binds());
        assert!(duplex.ensemble.is_some());

        // CCCC+AGGG: three GC pairs.
        assert!(report.pairwise[1].binds());

        assert_eq!(report.cumulative.len(), 1);
        let triplex = &report.cumulative[0];
        assert_eq!(triplex.label, "((s0+s1)+s2)");
        assert_eq!(triplex.constraint.len(), 14);
        assert_eq!(triplex.binding_energy, Some(0.0));
        assert!(!triplex.binds());
    }

    #[test]
    fn test_bind_stops_without_favorable_structure() {
        let nn = NearestNeighborModel::new();
        let engine = MfeEngine::new(&nn, ModelDetails::default());
        let args = bind_args(&["stickyfold", "bind"]);
        let seqs: Vec<String> = ["AC", "UG", "GGGG"].iter().map(|s| s.to_string()).collect();
        let report = bind(&engine, &seqs, &BindSettings::from(&args)).unwrap();
        assert_eq!(report.pairwise[0].mfe, ComplexMfe::NoFavorableStructure);
        assert_eq!(report.pairwise[0].binding_energy, None);
        assert!(report.cumulative.is_empty());
    }

    #[test]
    fn test_bind_needs_two_strands() {
        let nn = NearestNeighborModel::new();
        let engine = MfeEngine::new(&nn, ModelDetails::default());
        let args = bind_args(&["stickyfold", "bind"]);
        let seqs = vec!["GGGG".to_string()];
        assert_eq!(bind(&engine, &seqs, &BindSettings::from(&args)).unwrap_err(),
            ComplexError::TooFewStrands(1));
    }
}
