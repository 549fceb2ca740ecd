use crate::SIMILARITY_THRESHOLD;
use crate::core::photo::{PhotoGroup, PhotoRecord};

/// Groups a batch of photos by near-duplicate fingerprint matching.
///
/// The pass is greedy and order-dependent: each unassigned photo seeds a
/// group and pulls in every later unassigned photo within `threshold`
/// bits of the seed. Membership is decided against the seed alone, never
/// between members, so chains of similar photos do not merge
/// transitively. That asymmetry is intentional; "fixing" it into
/// union-find clustering would change which photos end up together.
///
/// O(n^2) distance checks, which is fine for the tens to low hundreds of
/// photos a batch holds.
#[derive(Debug)]
pub struct DuplicateGrouper {
    threshold: u32,
}

impl DuplicateGrouper {
    pub fn new() -> Self {
        Self {
            threshold: SIMILARITY_THRESHOLD,
        }
    }

    /// Override the Hamming distance ceiling for "near duplicate".
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Partition `records` into groups. Every record lands in exactly one
    /// group, singletons included, and groups come out in seed order.
    pub fn group(&self, records: Vec<PhotoRecord>) -> Vec<PhotoGroup> {
        let mut assigned = vec![false; records.len()];
        let mut index_groups: Vec<Vec<usize>> = Vec::new();

        for i in 0..records.len() {
            if assigned[i] {
                continue;
            }
            assigned[i] = true;
            let mut members = vec![i];

            for j in i + 1..records.len() {
                if assigned[j] {
                    continue;
                }
                if records[i].fingerprint.distance(&records[j].fingerprint) <= self.threshold {
                    members.push(j);
                    assigned[j] = true;
                }
            }

            index_groups.push(members);
        }

        // Move records into their groups; pixel buffers are never cloned.
        let mut slots: Vec<Option<PhotoRecord>> = records.into_iter().map(Some).collect();
        index_groups
            .into_iter()
            .map(|indices| {
                let members: Vec<PhotoRecord> = indices
                    .into_iter()
                    .filter_map(|idx| slots[idx].take())
                    .collect();
                PhotoGroup {
                    label: members[0].fingerprint.to_base64(),
                    members,
                }
            })
            .collect()
    }
}

impl Default for DuplicateGrouper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fingerprint::Fingerprint;
    use image::DynamicImage;

    fn record(name: &str, bits: [u8; 8]) -> PhotoRecord {
        PhotoRecord {
            name: name.to_string(),
            byte_size: 1000,
            fingerprint: Fingerprint::from_bytes(&bits).unwrap(),
            sharpness: 1.0,
            pixels: DynamicImage::new_rgb8(1, 1),
            preview: Vec::new(),
        }
    }

    fn names(group: &PhotoGroup) -> Vec<&str> {
        group.members.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_empty_batch_yields_no_groups() {
        let groups = DuplicateGrouper::new().group(Vec::new());
        assert!(groups.is_empty());
    }

    #[test]
    fn test_groups_partition_the_input() {
        let records = vec![
            record("a", [0, 0, 0, 0, 0, 0, 0, 0]),
            record("b", [0b0000_0011, 0, 0, 0, 0, 0, 0, 0]),
            record("c", [0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0]),
            record("d", [0xFF, 0xFF, 0xFF, 0b1111_1101, 0, 0, 0, 0]),
        ];

        let groups = DuplicateGrouper::new().group(records);

        let mut all: Vec<&str> = groups.iter().flat_map(names).collect();
        all.sort();
        assert_eq!(all, vec!["a", "b", "c", "d"]);
        assert_eq!(groups.len(), 2);
        assert_eq!(names(&groups[0]), vec!["a", "b"]);
        assert_eq!(names(&groups[1]), vec!["c", "d"]);
    }

    #[test]
    fn test_threshold_boundary() {
        // Exactly 5 bits from the seed joins; 6 bits does not.
        let records = vec![
            record("seed", [0, 0, 0, 0, 0, 0, 0, 0]),
            record("at5", [0b0001_1111, 0, 0, 0, 0, 0, 0, 0]),
            record("at6", [0, 0b0011_1111, 0, 0, 0, 0, 0, 0]),
        ];

        let groups = DuplicateGrouper::new().group(records);
        assert_eq!(groups.len(), 2);
        assert_eq!(names(&groups[0]), vec!["seed", "at5"]);
        assert_eq!(names(&groups[1]), vec!["at6"]);
    }

    #[test]
    fn test_membership_is_seed_only() {
        // y is within 5 bits of x but 6 bits from the seed, so it must
        // not ride into the seed's group on x's coattails.
        let seed = [0, 0, 0, 0, 0, 0, 0, 0];
        let x = [0b0001_1111, 0, 0, 0, 0, 0, 0, 0]; // 5 bits from seed
        let y = [0b0111_1110, 0, 0, 0, 0, 0, 0, 0]; // 6 bits from seed, 3 from x

        let fx = Fingerprint::from_bytes(&x).unwrap();
        let fy = Fingerprint::from_bytes(&y).unwrap();
        assert!(fx.distance(&fy) <= 5);

        let groups =
            DuplicateGrouper::new().group(vec![record("seed", seed), record("x", x), record("y", y)]);

        assert_eq!(groups.len(), 2);
        assert_eq!(names(&groups[0]), vec!["seed", "x"]);
        assert_eq!(names(&groups[1]), vec!["y"]);
    }

    #[test]
    fn test_all_unique_batch_yields_singletons() {
        let records = vec![
            record("a", [0x00, 0, 0, 0, 0, 0, 0, 0]),
            record("b", [0xFF, 0xFF, 0, 0, 0, 0, 0, 0]),
            record("c", [0, 0, 0xFF, 0xFF, 0xFF, 0, 0, 0]),
        ];

        let groups = DuplicateGrouper::new().group(records);
        assert_eq!(groups.len(), 3);
        assert!(groups.iter().all(|g| !g.is_reviewable()));
    }

    #[test]
    fn test_group_label_is_seed_hash() {
        let seed_bits = [0b1010_1010, 0, 0, 0, 0, 0, 0, 0];
        let groups = DuplicateGrouper::new().group(vec![
            record("seed", seed_bits),
            record("twin", seed_bits),
        ]);

        assert_eq!(groups.len(), 1);
        let expected = Fingerprint::from_bytes(&seed_bits).unwrap().to_base64();
        assert_eq!(groups[0].label, expected);
    }

    #[test]
    fn test_custom_threshold() {
        let records = vec![
            record("a", [0, 0, 0, 0, 0, 0, 0, 0]),
            record("b", [0b0000_0011, 0, 0, 0, 0, 0, 0, 0]),
        ];

        let groups = DuplicateGrouper::new().with_threshold(1).group(records);
        assert_eq!(groups.len(), 2);
    }
}
