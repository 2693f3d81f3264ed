//! Pure partitioning of a resource into fixed-size byte ranges.

use std::path::{Path, PathBuf};

use crate::part::Part;

/// Default size of one part: 10 MiB.
pub const DEFAULT_PART_SIZE: u64 = 10 * 1024 * 1024;

/// Split `total_size` bytes into index-ordered parts of `part_size` bytes.
///
/// Part `i` covers `[i * part_size, (i + 1) * part_size - 1]`. The final
/// part's end offset is deliberately not clamped to `total_size - 1`; range
/// semantics let the server truncate the response to the true last byte.
/// A `total_size` of zero yields no parts.
pub(crate) fn partition(total_size: u64, part_size: u64, dest: &Path) -> Vec<Part> {
    let mut parts = Vec::new();
    let mut start = 0;
    while start < total_size {
        let index = parts.len();
        parts.push(Part::new(
            index,
            start,
            start + part_size - 1,
            part_path(dest, index),
        ));
        start += part_size;
    }
    parts
}

/// Deterministic part-file name: the destination path with `.part<index>`
/// appended.
pub(crate) fn part_path(dest: &Path, index: usize) -> PathBuf {
    let mut name = dest.as_os_str().to_os_string();
    name.push(format!(".part{index}"));
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn splits_25_mib_into_three_unclamped_parts() {
        let total = 26_214_400; // 25 MiB
        let parts = partition(total, DEFAULT_PART_SIZE, Path::new("video.mp4"));

        assert_eq!(parts.len(), 3);
        assert_eq!((parts[0].start, parts[0].end), (0, 10_485_759));
        assert_eq!((parts[1].start, parts[1].end), (10_485_760, 20_971_519));
        // The last part's end exceeds the true last byte (26_214_399).
        assert_eq!((parts[2].start, parts[2].end), (20_971_520, 31_457_279));
    }

    #[test]
    fn exact_multiple_has_no_trailing_part() {
        let parts = partition(4096, 1024, Path::new("out.bin"));
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[3].end, 4095);
    }

    #[test]
    fn zero_size_yields_no_parts() {
        assert!(partition(0, DEFAULT_PART_SIZE, Path::new("out.bin")).is_empty());
    }

    #[test]
    fn part_paths_are_deterministic_and_indexed() {
        let dest = Path::new("downloads/video.mp4");
        assert_eq!(part_path(dest, 0), Path::new("downloads/video.mp4.part0"));
        assert_eq!(part_path(dest, 12), Path::new("downloads/video.mp4.part12"));
        assert_eq!(part_path(dest, 0), part_path(dest, 0));
    }

    proptest! {
        #[test]
        fn parts_cover_the_resource_contiguously(
            total in 1u64..4_000_000,
            size in 1u64..200_000,
        ) {
            let parts = partition(total, size, Path::new("out.bin"));

            prop_assert_eq!(parts.len() as u64, total.div_ceil(size));
            for (i, part) in parts.iter().enumerate() {
                prop_assert_eq!(part.index, i);
                prop_assert_eq!(part.start, i as u64 * size);
                prop_assert_eq!(part.end, part.start + size - 1);
                if i > 0 {
                    prop_assert_eq!(part.start, parts[i - 1].end + 1);
                }
            }
            let last = parts.last().unwrap();
            prop_assert!(last.start < total);
            prop_assert!(last.end >= total - 1);
        }
    }
}
