use criterion::{black_box, criterion_group, criterion_main, Criterion};
use motif_animation_core::{
    Clip, ClipSet, Config, Curve, Engine, Inputs, Interpolator, Keyframe, LoopMode,
    PlayerCommand,
};

const BONES: usize = 128;
const KEYS: usize = 240;

fn rig() -> ClipSet<f32> {
    let props = [
        "LocalPosition.x",
        "LocalPosition.y",
        "LocalPosition.z",
        "LocalEulerAnglesRaw.x",
        "LocalEulerAnglesRaw.y",
        "LocalEulerAnglesRaw.z",
    ];
    let ease = Interpolator::from_bytes([20, 20, 107, 107]);
    let clips = (0..BONES)
        .map(|b| {
            let mut clip = Clip::new(format!("bone{b}"));
            for (p, prop) in props.iter().enumerate() {
                let curve: Curve<f32> = (0..KEYS)
                    .map(|k| {
                        let v = ((b + p + k) % 17) as f32 * 0.1;
                        Keyframe::with_interpolator(k as f32 / 30.0, v, ease)
                    })
                    .collect();
                clip.set_curve(*prop, curve);
            }
            clip
        })
        .collect::<Vec<_>>();
    ClipSet::from(clips)
}

fn engine_update(c: &mut Criterion) {
    let mut eng = Engine::new(Config::default());
    let pid = eng.add_player("rig", rig());
    eng.update(
        0.0,
        Inputs {
            player_cmds: vec![
                PlayerCommand::SetLoopMode {
                    player: pid,
                    mode: LoopMode::Loop,
                },
                PlayerCommand::Play { player: pid },
            ],
        },
    );

    c.bench_function("engine_update_128_bones", |b| {
        b.iter(|| {
            let out = eng.update(black_box(1.0 / 60.0), Inputs::default());
            black_box(out.changes.len());
        })
    });
}

criterion_group!(benches, engine_update);
criterion_main!(benches);
