use rayon::prelude::*;

use crate::core::{count_positions, BaseCount, PosData, NUM_CHROMOSOMES};
use crate::runtime::{verify_error_rate, Error, Result};

use super::significance::is_significant;

///////////////////////////////
/// Group -> dense position map where every group is present, in group order
pub fn identity_positions(n_groups: usize) -> Vec<Option<u32>> {
    (0..n_groups as u32).map(Some).collect()
}

///////////////////////////////
/// Group -> dense position map for a subcluster. Members get positions 0.. in the order
/// given; repeated members keep their first position and every other group is absent
pub fn restrict_positions(n_groups: usize, members: &[u32]) -> Vec<Option<u32>> {
    let mut id_to_pos = vec![None; n_groups];
    let mut next = 0u32;
    for &g in members {
        if let Some(slot) = id_to_pos.get_mut(g as usize) {
            if slot.is_none() {
                *slot = Some(next);
                next += 1;
            }
        }
    }
    id_to_pos
}

/// Number of groups present in a subcluster, i.e. the size of its similarity matrix
pub fn subcluster_size(id_to_pos: &[Option<u32>]) -> usize {
    id_to_pos
        .iter()
        .filter_map(|p| *p)
        .map(|p| p as usize + 1)
        .max()
        .unwrap_or(0)
}

///////////////////////////////
/// Dense subcluster position of the group a cell belongs to, None if the group is not in
/// the current subcluster
#[inline]
fn position_of_cell(
    cell_id: u32,
    id_to_group: &[u32],
    id_to_pos: &[Option<u32>],
) -> Result<Option<u32>> {
    let group = *id_to_group
        .get(cell_id as usize)
        .ok_or_else(|| Error::cell_out_of_range(cell_id, id_to_group.len()))?;
    let pos = id_to_pos
        .get(group as usize)
        .ok_or_else(|| Error::group_out_of_range(group, id_to_pos.len()))?;
    Ok(*pos)
}

///////////////////////////////
/// Pool the cells at a position into one count per group of the current subcluster.
/// Entry i of the result holds the group with dense position i; cells in absent groups are
/// left out
pub fn pool_groups(
    pos_data: &PosData,
    id_to_group: &[u32],
    id_to_pos: &[Option<u32>],
) -> Result<Vec<BaseCount>> {
    let mut pooled = vec![BaseCount::ZERO; subcluster_size(id_to_pos)];
    for cell in &pos_data.cells {
        if let Some(p) = position_of_cell(cell.cell_id, id_to_group, id_to_pos)? {
            pooled[p as usize] += cell.counts;
        }
    }
    Ok(pooled)
}

///////////////////////////////
/// Size of the worker pool for `num_tasks` independent tasks. 0 stays 0, which rayon takes as
/// all available cores; any other count is capped at one worker per task
pub fn worker_threads(num_threads: usize, num_tasks: usize) -> usize {
    if num_threads == 0 {
        0
    } else {
        num_threads.min(num_tasks.max(1))
    }
}

///////////////////////////////
/// Keep the positions that carry signal within the current subcluster.
///
/// `id_to_group` maps each cell to its group; cells of a group are pooled as one. `id_to_pos`
/// maps each group to its position in the subcluster, None for groups outside it. Kept positions
/// are returned unchanged, per chromosome, in input order, together with the mean pooled
/// coverage of the kept positions. `num_threads` = 0 uses all available cores.
///
/// The result does not depend on the number of threads.
pub fn filter(
    pos_data: &[Vec<PosData>],
    id_to_group: &[u32],
    id_to_pos: &[Option<u32>],
    marker: &str,
    seq_error_rate: f64,
    num_threads: usize,
) -> Result<(Vec<Vec<PosData>>, f64)> {
    let theta = verify_error_rate(seq_error_rate)?;
    if pos_data.len() > NUM_CHROMOSOMES {
        return Err(Error::chromosome_out_of_range(
            pos_data.len() - 1,
            NUM_CHROMOSOMES,
        ));
    }

    let thread_pool = rayon::ThreadPoolBuilder::new()
        .num_threads(worker_threads(num_threads, count_positions(pos_data)))
        .build()
        .map_err(|e| Error::thread_pool(Some(e.to_string())))?;

    log::debug!(
        "Filtering subcluster '{}' with {} threads",
        marker,
        thread_pool.current_num_threads()
    );

    //Each worker returns the indices it kept; the ordered collect merges them
    let kept: Vec<Vec<(usize, u32)>> = thread_pool.install(|| {
        pos_data
            .par_iter()
            .map(|chr| {
                chr.par_iter()
                    .enumerate()
                    .map(|(i, pos)| -> Result<Option<(usize, u32)>> {
                        let pooled: BaseCount =
                            pool_groups(pos, id_to_group, id_to_pos)?.into_iter().sum();
                        if is_significant(&pooled, theta) {
                            Ok(Some((i, pooled.coverage())))
                        } else {
                            Ok(None)
                        }
                    })
                    .filter_map(|r| r.transpose())
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()
    })?;

    //Integer sum, so the average is identical whatever the scheduling
    let mut total_coverage: u64 = 0;
    let mut num_kept: u64 = 0;
    let mut result = Vec::with_capacity(kept.len());
    for (chr, kept_chr) in pos_data.iter().zip(kept) {
        let mut out_chr = Vec::with_capacity(kept_chr.len());
        for (i, coverage) in kept_chr {
            total_coverage += coverage as u64;
            num_kept += 1;
            out_chr.push(chr[i].clone());
        }
        result.push(out_chr);
    }

    let avg_coverage = if num_kept == 0 {
        0.0
    } else {
        total_coverage as f64 / num_kept as f64
    };

    log::info!(
        "Subcluster '{}': kept {} of {} positions, average coverage {:.2}",
        marker,
        num_kept,
        count_positions(pos_data),
        avg_coverage
    );

    Ok((result, avg_coverage))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CellCount;

    fn pos(position: u32, cells: &[(u32, [u32; 4])]) -> PosData {
        PosData::new(
            position,
            cells
                .iter()
                .map(|&(id, c)| CellCount::new(id, BaseCount(c)))
                .collect(),
        )
    }

    #[test]
    fn restrict_is_dense_and_injective() {
        let m = restrict_positions(5, &[3, 1, 3, 7]);
        assert_eq!(m, vec![None, Some(1), None, Some(0), None]);
        assert_eq!(subcluster_size(&m), 2);
        assert_eq!(subcluster_size(&identity_positions(4)), 4);
        assert_eq!(subcluster_size(&[]), 0);
    }

    #[test]
    fn pool_by_group() {
        let p = pos(0, &[(0, [1, 0, 0, 0]), (1, [2, 0, 0, 0]), (2, [0, 0, 0, 5])]);
        //cells 0 and 1 form group 0, cell 2 is group 1
        let id_to_group = vec![0, 0, 1];
        let pooled = pool_groups(&p, &id_to_group, &identity_positions(2)).unwrap();
        assert_eq!(pooled, vec![BaseCount::new(3, 0, 0, 0), BaseCount::new(0, 0, 0, 5)]);

        let pooled = pool_groups(&p, &id_to_group, &[None, Some(0)]).unwrap();
        assert_eq!(pooled, vec![BaseCount::new(0, 0, 0, 5)]);
    }

    #[test]
    fn pool_is_capped_by_work() {
        assert_eq!(worker_threads(0, 5), 0);
        assert_eq!(worker_threads(8, 3), 3);
        assert_eq!(worker_threads(2, 100), 2);
        assert_eq!(worker_threads(200_000, 0), 1);
    }

    #[test]
    fn unknown_cell_is_an_error() {
        let p = pos(0, &[(4, [1, 0, 0, 0])]);
        let res = pool_groups(&p, &[0, 0], &identity_positions(1));
        assert!(matches!(res, Err(Error::CellOutOfRange { cell_id: 4, .. })));

        let res = pool_groups(&p, &[0, 0, 0, 0, 3], &identity_positions(1));
        assert!(matches!(res, Err(Error::GroupOutOfRange { group_id: 3, .. })));
    }

    #[test]
    fn keeps_only_significant_positions() {
        let data = vec![vec![
            pos(1, &[(0, [30, 0, 0, 0]), (1, [0, 0, 0, 30])]),
            pos(2, &[(0, [30, 0, 0, 0]), (1, [30, 0, 0, 0])]),
            pos(3, &[(0, [0, 20, 0, 0]), (1, [0, 0, 20, 0])]),
        ]];
        let (kept, avg) =
            filter(&data, &[0, 1], &identity_positions(2), "A", 0.01, 2).unwrap();
        assert_eq!(kept.len(), 1);
        let positions: Vec<u32> = kept[0].iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![1, 3]);
        assert_eq!(avg, 50.0);
        //the kept record keeps its per-cell structure
        assert_eq!(kept[0][0], data[0][0]);
    }

    #[test]
    fn empty_input() {
        let (kept, avg) = filter(&[], &[], &[], "", 0.01, 1).unwrap();
        assert!(kept.is_empty());
        assert_eq!(avg, 0.0);
    }

    #[test]
    fn rejects_bad_error_rate() {
        let res = filter(&[], &[], &[], "", 1.5, 1);
        assert!(matches!(res, Err(Error::InvalidErrorRate { .. })));
    }

    #[test]
    fn rejects_too_many_chromosomes() {
        let data = vec![Vec::new(); NUM_CHROMOSOMES + 1];
        let res = filter(&data, &[], &[], "", 0.01, 1);
        assert!(matches!(res, Err(Error::ChromosomeOutOfRange { .. })));
    }
}
