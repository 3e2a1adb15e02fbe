//! Region output regression test
//!
//! Covers region ordering, statistics lines and recoloring, including
//! writing the recolored image and re-reading it.
//!
//! Generate golden files:
//! ```
//! REGTEST_MODE=generate cargo test -p colormerge-region --test materialize_reg
//! ```

use std::collections::HashSet;

use colormerge_core::{ImageFormat, Pix, PixMut, Rgb, color};
use colormerge_region::{
    SegmentOptions, recolor, recolored, region_summaries, segment, write_summaries,
};
use colormerge_test::{RegParams, random_palette_image};

fn report(summaries: &[colormerge_region::RegionSummary]) -> Vec<u8> {
    let mut out = Vec::new();
    write_summaries(&mut out, summaries).unwrap();
    out
}

#[test]
fn materialize_examples_reg() {
    let mut rp = RegParams::new("materialize_examples");

    // [black, white, black] with K = 2: the first pair merges into root 1
    let mut pm = PixMut::new(3, 1).unwrap();
    pm.set_rgb(0, 0, 0, 0, 0).unwrap();
    pm.set_rgb(1, 0, 255, 255, 255).unwrap();
    pm.set_rgb(2, 0, 0, 0, 0).unwrap();
    let row: Pix = pm.into();

    let seg = segment(&row, &SegmentOptions::new(2)).unwrap();
    let (out, summaries) = recolored(&row, &seg).unwrap();
    rp.compare_strings(
        b"region 1 size= 2 color=127,127,127\nregion 2 size= 1 color=0,0,0\n",
        &report(&summaries),
    );
    rp.compare_values(1.0, summaries[0].root as f64, 0.0);
    assert_eq!(out.get_rgb(0, 0), Some((127, 127, 127)));
    assert_eq!(out.get_rgb(1, 0), Some((127, 127, 127)));
    assert_eq!(out.get_rgb(2, 0), Some((0, 0, 0)));

    // A solid 2x2 block keeps its color in both regions
    let solid = Pix::new_filled(2, 2, color::compose_rgb(10, 20, 30)).unwrap();
    let seg = segment(&solid, &SegmentOptions::new(2)).unwrap();
    let (out, summaries) = recolored(&solid, &seg).unwrap();
    rp.compare_strings(
        b"region 1 size= 3 color=10,20,30\nregion 2 size= 1 color=10,20,30\n",
        &report(&summaries),
    );
    rp.compare_pix(&solid, &out);

    assert!(rp.cleanup(), "materialize examples regression test failed");
}

#[test]
fn materialize_reg() {
    let mut rp = RegParams::new("materialize");

    let palette = [(250, 10, 10), (10, 250, 10), (10, 10, 250), (240, 240, 240)];
    let pixs = random_palette_image(32, 20, &palette, 2024).unwrap();
    let target = 8;
    let seg = segment(&pixs, &SegmentOptions::new(target)).unwrap();

    // Ordered by size, then root, both descending
    let summaries = region_summaries(&seg).unwrap();
    rp.compare_values(target as f64, summaries.len() as f64, 0.0);
    for pair in summaries.windows(2) {
        assert!((pair[0].size, pair[0].root) > (pair[1].size, pair[1].root));
        assert_eq!(pair[0].ordinal + 1, pair[1].ordinal);
    }
    let total: usize = summaries.iter().map(|s| s.size).sum();
    rp.compare_values(pixs.data().len() as f64, total as f64, 0.0);

    // Recoloring twice gives the same image and statistics
    let (first, first_summaries) = recolored(&pixs, &seg).unwrap();
    let mut again = pixs.to_mut();
    let again_summaries = recolor(&mut again, &seg).unwrap();
    let again: Pix = again.into();
    rp.compare_pix(&first, &again);
    rp.compare_strings(&report(&first_summaries), &report(&again_summaries));

    // Every pixel now carries its region's average color
    let colors: HashSet<u32> = first.data().iter().copied().collect();
    assert!(colors.len() <= target as usize);
    for id in 0..pixs.data().len() {
        let root = seg.region_of(id).unwrap();
        assert_eq!(
            Rgb::from_pixel(first.data()[id]),
            seg.average_color(root).unwrap()
        );
    }

    // The recolored image survives a PNG round trip
    let bytes = colormerge_io::write_image_mem(&first, ImageFormat::Png).unwrap();
    let back = colormerge_io::read_image_mem(&bytes).unwrap();
    rp.compare_pix(&first, &back);

    rp.write_pix_and_check(&first, ImageFormat::Png).unwrap();
    rp.write_data_and_check(&report(&first_summaries), "txt")
        .unwrap();

    assert!(rp.cleanup(), "materialize regression test failed");
}
