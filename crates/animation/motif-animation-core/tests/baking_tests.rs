use motif_animation_core::{
    bake_clip_set, export_baked_json, load_motion_json, BakingConfig, ClipSet, Config,
};

#[test]
fn baked_morphs_match_direct_evaluation() {
    let json = motif_test_fixtures::motions::json("basic").unwrap();
    let motion = load_motion_json(&json, &Config::default()).unwrap();
    let baked = bake_clip_set(
        &motion.morphs,
        &BakingConfig {
            frame_rate: 30.0,
            ..Default::default()
        },
    );

    // morph duration is 2s (frame 60): 61 inclusive frames
    assert_eq!(baked.frame_count(), 61);
    assert_eq!(baked.curves.len(), 2);
    for baked_curve in &baked.curves {
        let clip = motion.morphs.get(baked_curve.clip as usize).unwrap();
        let curve = clip.curve(&baked_curve.property).unwrap();
        for (f, v) in baked_curve.values.iter().enumerate() {
            let t = (f as f32 / 30.0).min(baked.end_time);
            assert_eq!(*v, curve.evaluate(t));
        }
    }

    let json = export_baked_json(&baked);
    assert_eq!(json["curves"][1]["clip_name"], "smile");
    assert_eq!(json["frame_rate"], 30.0);
}

#[test]
fn empty_clip_set_bakes_nothing() {
    let set: ClipSet<f32> = ClipSet::with_len(3);
    let baked = bake_clip_set(&set, &BakingConfig::default());
    assert!(baked.curves.is_empty());
    assert_eq!(baked.frame_count(), 0);
    assert_eq!(baked.end_time, 0.0);
}
