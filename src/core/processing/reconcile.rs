use ndarray::{Array1, ArrayView2};
use tracing::debug;

use crate::core::processing::compact::compact;
use crate::core::processing::field::{GridField, Mask};
use crate::error::{Error, Result};
use crate::types::MaskPolicy;

/// Arrays of one shape that share exactly one validity mask.
/// Member 0 is the reference field; the rest follow in the order given to
/// [`MaskReconciler::align`].
#[derive(Debug, Clone)]
pub struct AlignedGroup<'a> {
    mask: Mask,
    members: Vec<(&'a str, ArrayView2<'a, f64>)>,
}

impl<'a> AlignedGroup<'a> {
    /// The mask every member now reports.
    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.mask.dim()
    }

    pub fn names(&self) -> Vec<&'a str> {
        self.members.iter().map(|(name, _)| *name).collect()
    }

    pub fn arrays(&self) -> Vec<ArrayView2<'a, f64>> {
        self.members.iter().map(|(_, view)| view.clone()).collect()
    }

    pub fn valid_count(&self) -> usize {
        self.mask.iter().filter(|&&invalid| !invalid).count()
    }

    /// Compact every member under the shared mask, in member order.
    pub fn compact(&self) -> Result<Vec<Array1<f64>>> {
        compact(&self.mask, &self.arrays())
    }
}

/// Forces dependent arrays onto the validity pattern of a reference field.
#[derive(Debug, Clone, Copy)]
pub struct MaskReconciler {
    policy: MaskPolicy,
}

impl Default for MaskReconciler {
    fn default() -> Self {
        Self::new(MaskPolicy::Adopt)
    }
}

impl MaskReconciler {
    pub fn new(policy: MaskPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MaskPolicy {
        self.policy
    }

    /// Align `dependents` onto `reference`. Every dependent must have the
    /// reference's shape; the data itself is borrowed, never modified.
    ///
    /// With [`MaskPolicy::Adopt`] the dependents' own masks are discarded and
    /// the reference mask is used verbatim. With [`MaskPolicy::Intersect`] a cell
    /// stays valid only if the reference and every dependent consider it valid.
    pub fn align<'a>(
        &self,
        reference: &'a GridField,
        dependents: &[&'a GridField],
    ) -> Result<AlignedGroup<'a>> {
        let expected = reference.shape();
        for dependent in dependents {
            if dependent.shape() != expected {
                return Err(Error::shape_mismatch(
                    format!("`{}` aligned to `{}`", dependent.name(), reference.name()),
                    &[expected.0, expected.1],
                    &[dependent.shape().0, dependent.shape().1],
                ));
            }
        }

        let mut mask = reference.mask().clone();
        if self.policy == MaskPolicy::Intersect {
            for dependent in dependents {
                dependent.merge_invalid_into(&mut mask);
            }
        }

        let members = std::iter::once(reference)
            .chain(dependents.iter().copied())
            .map(|field| (field.name(), field.data()))
            .collect();

        let group = AlignedGroup { mask, members };
        debug!(
            "Aligned {} arrays to `{}` ({}): valid={} of {}",
            group.len(),
            reference.name(),
            self.policy,
            group.valid_count(),
            group.mask.len()
        );
        Ok(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn value_field() -> GridField {
        GridField::with_mask(
            "chlor_a",
            array![[1.0, 99.0], [3.0, 4.0]],
            array![[false, true], [false, false]],
        )
        .unwrap()
    }

    #[test]
    fn adopt_overwrites_a_more_permissive_mask() {
        let value = value_field();
        let uncertainty = GridField::fully_valid("rmsd", array![[5.0, 6.0], [7.0, 8.0]]);
        let group = MaskReconciler::new(MaskPolicy::Adopt)
            .align(&value, &[&uncertainty])
            .unwrap();
        assert_eq!(group.mask(), value.mask());
        assert_eq!(group.valid_count(), 3);
    }

    #[test]
    fn adopt_overwrites_a_stricter_mask() {
        let value = value_field();
        let uncertainty = GridField::with_mask(
            "rmsd",
            array![[5.0, 6.0], [7.0, 8.0]],
            array![[true, true], [true, false]],
        )
        .unwrap();
        let group = MaskReconciler::default().align(&value, &[&uncertainty]).unwrap();
        // cells invalid only in the dependent come back as valid
        assert_eq!(group.mask(), &array![[false, true], [false, false]]);
    }

    #[test]
    fn intersect_keeps_cells_valid_everywhere() {
        let value = value_field();
        let uncertainty = GridField::with_mask(
            "rmsd",
            array![[5.0, 6.0], [7.0, 8.0]],
            array![[true, false], [false, false]],
        )
        .unwrap();
        let group = MaskReconciler::new(MaskPolicy::Intersect)
            .align(&value, &[&uncertainty])
            .unwrap();
        assert_eq!(group.mask(), &array![[true, true], [false, false]]);
    }

    #[test]
    fn dependent_shape_must_match_reference() {
        let value = value_field();
        let wrong = GridField::fully_valid("lon", ndarray::Array2::zeros((3, 2)));
        let err = MaskReconciler::default().align(&value, &[&wrong]);
        assert!(matches!(err, Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn members_keep_their_order_and_data() {
        let value = value_field();
        let lon = GridField::fully_valid("lon", array![[10.0, 20.0], [10.0, 20.0]]);
        let group = MaskReconciler::default().align(&value, &[&lon]).unwrap();
        assert_eq!(group.names(), vec!["chlor_a", "lon"]);
        assert_eq!(group.arrays()[1], lon.data());
        // originals untouched
        assert_eq!(lon.valid_count(), 4);
    }
}
