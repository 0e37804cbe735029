use crate::cli::ProfileArgs;
use crate::io::{read_stockholm, ProfileWriter, StemLoopSummary, StemLoopWriter};
use crate::motif::{build_motifs, StructureType};
use crate::search::{search_plan, seed_length, MotifBacktrackIterator};
use crate::utils::{create_writer, format_number_with_commas, Result};
use std::collections::HashMap;

pub fn profile(args: ProfileArgs) -> Result<()> {
    let records = read_stockholm(&args.alignment_path)?;
    log::info!("Read {} alignment records", records.len());

    let mut profile_writer = create_writer(&args.output_prefix, "profile.tsv", ProfileWriter::new)?;
    let mut stem_loop_writer =
        create_writer(&args.output_prefix, "stemloops.tsv", StemLoopWriter::new)?;

    let motifs = build_motifs(records, &args.motif_params(), args.num_threads)?;
    let num_built = motifs.iter().flatten().count();
    log::info!("Built {} of {} motifs", num_built, motifs.len());

    let mut entropy_by_type: HashMap<StructureType, (f64, usize)> = HashMap::new();
    for motif in motifs.iter().flatten() {
        for (index, stem_loop) in motif.stem_loops.iter().enumerate() {
            for element in &stem_loop.elements {
                let entry = entropy_by_type.entry(element.kind).or_default();
                entry.0 += element.entropy();
                entry.1 += 1;
            }
            let iter = MotifBacktrackIterator::new(&stem_loop.elements, args.min_frequency);
            let summary = StemLoopSummary {
                seed_length: seed_length(&search_plan(&stem_loop.elements)),
                search_space: iter.total_combinations(),
            };
            log::info!(
                "{} stem-loop {}: {} elements, {} candidates",
                motif.name(),
                index,
                stem_loop.elements.len(),
                format_number_with_commas(summary.search_space)
            );
            profile_writer.write(motif, index, stem_loop);
            stem_loop_writer.write(motif, index, stem_loop, &summary);
        }
    }

    let mut types: Vec<_> = entropy_by_type.into_iter().collect();
    types.sort_by_key(|(kind, _)| kind.to_string());
    for (kind, (entropy, count)) in types {
        log::info!(
            "{}: {} elements, mean entropy {:.3} bits",
            kind,
            count,
            entropy / count as f64
        );
    }

    profile_writer.finish()?;
    stem_loop_writer.finish()?;
    Ok(())
}
