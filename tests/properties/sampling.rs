//! Property tests for frame decimation and naming.

use proptest::prelude::*;

use walkmesh::domain::value_objects::{effective_source_fps, frame_file_name, SamplingOptions};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: the stride is at least 1 whatever the container reports.
    #[test]
    fn property_stride_is_never_zero(
        target in 0.01f64..1000.0,
        reported in prop_oneof![
            Just(0.0),
            Just(f64::NAN),
            Just(-25.0),
            0.01f64..1000.0,
        ],
    ) {
        let options = SamplingOptions::new(Some(target), None).unwrap();
        prop_assert!(options.stride(reported) >= 1);
    }

    /// PROPERTY: a target at or above the source rate keeps every frame.
    #[test]
    fn property_never_upsamples(
        source in 0.5f64..240.0,
        factor in 1.0f64..10.0,
    ) {
        let options = SamplingOptions::new(Some(source * factor), None).unwrap();
        prop_assert_eq!(options.stride(source), 1);
    }

    /// PROPERTY: the stride is the nearest whole ratio of source to target.
    #[test]
    fn property_stride_tracks_ratio(
        source in 1.0f64..240.0,
        target in 0.05f64..240.0,
    ) {
        prop_assume!(target < source);
        let options = SamplingOptions::new(Some(target), None).unwrap();
        let stride = options.stride(source) as f64;
        let ratio = effective_source_fps(source) / target;
        prop_assert!((ratio - stride).abs() <= 0.5 + 1e-9, "ratio {} stride {}", ratio, stride);
    }

    /// PROPERTY: lexical order of frame names equals temporal order.
    #[test]
    fn property_frame_names_sort_temporally(
        a in 1usize..=999_999,
        b in 1usize..=999_999,
    ) {
        let (name_a, name_b) = (frame_file_name(a), frame_file_name(b));
        prop_assert_eq!(a.cmp(&b), name_a.cmp(&name_b));
    }
}
