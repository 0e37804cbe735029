use crate::cli::SearchArgs;
use crate::io::{
    read_reference_positions, read_references, read_stockholm, HitWriter, ReferencePosition,
    ReferencePositions,
};
use crate::motif::{build_motifs, Motif, StemLoop};
use crate::search::{
    distinct_candidates, search_plan, seed_length, validate, Hit, MotifSearch, ReferenceIndex,
    SearchParams, Strand,
};
use crate::utils::{create_writer, format_number_with_commas, Result};
use crossbeam_channel::{bounded, Sender};
use std::thread;

const CHANNEL_BUFFER_SIZE: usize = 2048;

pub fn search(args: SearchArgs) -> Result<()> {
    let records = read_stockholm(&args.alignment_path)?;
    let references = read_references(&args.genome_path)?;
    log::info!(
        "Read {} alignment records and {} reference sequences",
        records.len(),
        references.len()
    );

    let motifs = build_motifs(records, &args.motif_params(), args.num_threads)?;
    log::info!(
        "Built {} of {} motifs",
        motifs.iter().flatten().count(),
        motifs.len()
    );

    let positions = match &args.positions_path {
        Some(path) if path.exists() => read_reference_positions(path, args.include_reverse)?,
        Some(path) => {
            log::warn!(
                "Reference position file {} does not exist, skipping search",
                path.display()
            );
            return Ok(());
        }
        None => {
            log::warn!("No reference position file given, skipping search");
            return Ok(());
        }
    };

    log::info!("Indexing {} reference sequences", references.len());
    let index = ReferenceIndex::new(&references)?;
    drop(references);

    let mut hit_writer = create_writer(&args.output_prefix, "hits.tsv", HitWriter::new)?;
    let (sender, receiver) = bounded(CHANNEL_BUFFER_SIZE);
    let writer_thread = thread::spawn(move || {
        for hit in &receiver {
            hit_writer.write(&hit);
        }
        hit_writer.finish()
    });

    let params = args.search_params();
    let result = search_motifs(&motifs, &positions, &index, &params, &sender);

    drop(sender);
    let write_result = writer_thread.join().expect("Writer thread panicked");
    log::trace!("Writer thread finished");
    result?;
    write_result
}

fn search_motifs(
    motifs: &[Option<Motif>],
    positions: &ReferencePositions,
    index: &ReferenceIndex,
    params: &SearchParams,
    sender: &Sender<Hit>,
) -> Result<()> {
    for motif in motifs.iter().flatten() {
        let members = family_members(motif, positions);
        for (stem_loop_index, stem_loop) in motif.stem_loops.iter().enumerate() {
            let Some(hits) = search_stem_loop(motif, stem_loop_index, stem_loop, index, params) else {
                continue;
            };
            let validation = validate(&hits, members);
            log::info!(
                "{} stem-loop {}: {} hits ({} distinct candidates), {} inside / {} outside known members, {} of {} members found",
                motif.name(),
                stem_loop_index,
                format_number_with_commas(validation.hits as u64),
                distinct_candidates(&hits),
                validation.hits_inside,
                validation.hits_outside(),
                validation.members_found,
                validation.members
            );
            for hit in hits {
                sender
                    .send(hit)
                    .map_err(|e| format!("Failed to send hit to writer: {}", e))?;
            }
        }
    }
    Ok(())
}

fn family_members<'a>(motif: &Motif, positions: &'a ReferencePositions) -> &'a [ReferencePosition] {
    motif
        .family_keys()
        .find_map(|key| positions.get(key))
        .map(|members| members.as_slice())
        .unwrap_or(&[])
}

/// Runs one search over a stem-loop. Returns `None` when the stem-loop is
/// too short to be searched.
fn search_stem_loop(
    motif: &Motif,
    stem_loop_index: usize,
    stem_loop: &StemLoop,
    index: &ReferenceIndex,
    params: &SearchParams,
) -> Option<Vec<Hit>> {
    let length = seed_length(&search_plan(&stem_loop.elements));
    if length < params.min_seed_length {
        log::info!(
            "{} stem-loop {}: skipped, spells {} bases, minimum is {}",
            motif.name(),
            stem_loop_index,
            length,
            params.min_seed_length
        );
        return None;
    }

    let mut search = MotifSearch::new(&stem_loop.elements, index.cursor(), params);
    let mut hits = Vec::new();
    while search.next() {
        let candidate = String::from_utf8_lossy(&search.candidate()).into_owned();
        let probability = search.probability();
        for occurrence in search.occurrences() {
            if occurrence.strand == Strand::Reverse && !params.include_reverse {
                continue;
            }
            hits.push(Hit {
                family: motif.name().to_string(),
                stem_loop: stem_loop_index,
                candidate: candidate.clone(),
                probability,
                reference: index.sequence_id(occurrence.sequence).to_string(),
                start: occurrence.offset,
                end: occurrence.offset + candidate.len(),
                strand: occurrence.strand,
            });
        }
    }
    log::debug!(
        "{} stem-loop {}: {} complete candidates generated",
        motif.name(),
        stem_loop_index,
        format_number_with_commas(search.combinations())
    );
    Some(hits)
}
