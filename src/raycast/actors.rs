use glam::{Vec2, Vec3};

use super::{ImpactKind, MapRaycast, RaycastQuery, RaycastResult};
use crate::sim::{ActorHandle, ActorRegistry};

/// Ray vs. a finite vertical cylinder whose base centre is `base`.
///
/// * A start inside the cylinder reports a zero-distance hit.
/// * Side hits get a horizontal normal, cap hits `±Z`.
pub fn raycast_vs_z_cylinder(
    query: &RaycastQuery,
    base: Vec3,
    height: f32,
    radius: f32,
) -> RaycastResult {
    let (z_min, z_max) = (base.z, base.z + height);
    let start = query.start;
    let dir = query.direction;
    let max = query.max_distance;

    let rel = start.truncate() - base.truncate();
    let r_sq = radius * radius;
    let inside_disc = rel.length_squared() < r_sq;

    if inside_disc && (z_min..=z_max).contains(&start.z) {
        return RaycastResult::hit(*query, 0.0, -dir);
    }

    let mut best: Option<(f32, Vec3)> = None;

    /* ----- curved side --------------------------------------------- */
    let dxy: Vec2 = dir.truncate();
    let a = dxy.length_squared();
    if a > 0.0 && !inside_disc {
        let b = rel.dot(dxy);
        let c = rel.length_squared() - r_sq;
        let disc = b * b - a * c;
        if disc >= 0.0 {
            let t = (-b - disc.sqrt()) / a;
            if (0.0..=max).contains(&t) {
                let p = query.point_at(t);
                if (z_min..=z_max).contains(&p.z) {
                    let n = (p.truncate() - base.truncate()).normalize_or_zero();
                    best = Some((t, n.extend(0.0)));
                }
            }
        }
    }

    /* ----- end caps ------------------------------------------------ */
    if dir.z != 0.0 {
        let (plane, normal) = if dir.z > 0.0 {
            (z_min, Vec3::NEG_Z)
        } else {
            (z_max, Vec3::Z)
        };
        let t = (plane - start.z) / dir.z;
        if (0.0..=max).contains(&t) && best.is_none_or(|(bt, _)| t < bt) {
            let p = query.point_at(t);
            if (p.truncate() - base.truncate()).length_squared() <= r_sq {
                best = Some((t, normal));
            }
        }
    }

    match best {
        Some((t, n)) => RaycastResult::hit(*query, t, n),
        None => RaycastResult::miss(*query),
    }
}

/// Nearest cylinder hit among live actors not listed in `exclude`.
///
/// Zero-distance hits (the ray starting inside a body) are skipped in
/// favour of the next nearest.
pub fn raycast_actors(
    actors: &ActorRegistry,
    query: &RaycastQuery,
    exclude: &[ActorHandle],
) -> MapRaycast {
    let mut best: Option<(RaycastResult, ActorHandle)> = None;

    for (handle, actor) in actors.iter() {
        if !actor.body.is_live() || exclude.contains(&handle) {
            continue;
        }
        let body = &actor.body;
        let hit = raycast_vs_z_cylinder(query, body.position, body.height, body.radius);
        if !hit.did_impact || hit.impact_distance <= 0.0 {
            continue;
        }
        if best.is_none_or(|(b, _)| hit.impact_distance < b.impact_distance) {
            best = Some((hit, handle));
        }
    }

    match best {
        Some((ray, handle)) => MapRaycast {
            ray,
            kind: ImpactKind::Actor,
            actor: Some(handle),
        },
        None => MapRaycast::miss(*query),
    }
}
