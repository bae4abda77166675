//! Restarted limited-memory Broyden updates with Powell damping.

use secant_core::kernels::{axpy, blend_assign, dot, norm_squared, scaled_copy};

use crate::direction::DirectionStatus;
use crate::error::Result;
use crate::workspace::AccelWorkspace;

/// Apply the damped limited-memory Broyden operator to `-R`.
///
/// The stored rank-one updates are applied oldest first to both the staged
/// secant vector and the direction, reconstructing the action of the implicit
/// operator without ever forming it. The new update vector is damped with
/// Powell's rule before being stored, which keeps its denominator bounded
/// away from zero even when the raw secant pair is nearly degenerate.
pub(crate) fn compute_restarted_broyden(work: &mut AccelWorkspace) -> Result<DirectionStatus> {
    let l = work.dim();
    let theta_bar = work.config.theta_bar;
    let slot = work.cache.cursor();

    // dir = -R
    scaled_copy(&mut work.direction, &work.residual, -1.0);

    // Stage s_tilde in the S slot at the cursor; the slot is finalized with
    // Sk once the update vector has been derived.
    let (s_used, s_tail) = work.cache.s.split_at_mut(slot * l);
    let s_tilde = &mut s_tail[..l];
    s_tilde.copy_from_slice(&work.delta_residual);

    // Sequentially apply every stored rank-one update, oldest first.
    for i in 0..slot {
        let s_i = &s_used[i * l..(i + 1) * l];
        let u_i = &work.cache.u[i * l..(i + 1) * l];
        let ip = dot(s_i, s_tilde);
        axpy(s_tilde, u_i, ip);
        let ip = dot(s_i, &work.direction);
        axpy(&mut work.direction, u_i, ip);
    }

    let ip = dot(s_tilde, &work.delta_x);
    let s_norm_sq = norm_squared(&work.delta_x);

    // Zero iterate change: store the pair without deriving an update vector
    // so no division can occur. The stored zero slots are inert in later
    // iterations.
    if s_norm_sq == 0.0 {
        s_tilde.copy_from_slice(&work.delta_x);
        work.cache.u[slot * l..(slot + 1) * l].fill(0.0);
        return Ok(advance_and_log(work));
    }

    // Powell's damping trick: the raw pair is kept whenever |ip| clears the
    // threshold (the boundary itself belongs to the undamped branch), else
    // s_tilde is blended toward Sk. sign(0) counts as 0, which degenerates
    // theta to 1.
    let theta = if ip.abs() >= theta_bar * s_norm_sq {
        1.0
    } else {
        let sign = if ip > 0.0 {
            1.0
        } else if ip < 0.0 {
            -1.0
        } else {
            0.0
        };
        let theta = s_norm_sq * (1.0 - sign * theta_bar) / (s_norm_sq - ip);
        blend_assign(s_tilde, theta, &work.delta_x, 1.0 - theta);
        theta
    };

    // The denominator uses the inner product from before the blend.
    let denom = (1.0 - theta) * s_norm_sq + theta * ip;

    // u_new = (Sk - s_tilde) / denom, stored at the cursor slot of U, then
    // applied to the direction assembled from all prior updates.
    {
        let u_new = &mut work.cache.u[slot * l..(slot + 1) * l];
        for ((u, &sk), &st) in u_new
            .iter_mut()
            .zip(work.delta_x.iter())
            .zip(s_tilde.iter())
        {
            *u = (sk - st) / denom;
        }

        let ip = dot(&work.delta_x, &work.direction);
        axpy(&mut work.direction, u_new, ip);
    }

    // Finalize the stored secant vector, replacing the staged s_tilde.
    s_tilde.copy_from_slice(&work.delta_x);

    Ok(advance_and_log(work))
}

fn advance_and_log(work: &mut AccelWorkspace) -> DirectionStatus {
    let capacity = work.cache.capacity();
    let status = work.cache.advance_or_restart();
    if status.is_reset() {
        log::debug!("secant memory exhausted after {} updates, restarting", capacity);
    }
    status
}

#[cfg(test)]
mod tests {
    use crate::config::{AccelConfig, DirectionStrategy};
    use crate::direction::DirectionStatus;
    use crate::workspace::AccelWorkspace;

    fn broyden_workspace(l: usize, memory: usize, theta_bar: f64) -> AccelWorkspace {
        let config = AccelConfig::default()
            .with_direction(DirectionStrategy::RestartedBroyden)
            .with_memory(memory)
            .with_theta_bar(theta_bar);
        AccelWorkspace::new(l, config).unwrap()
    }

    #[test]
    fn first_update_closed_form() {
        // Empty cache, scalar problem, undamped branch:
        //   s_tilde = Yk, ip = Yk*Sk, theta = 1, denom = ip,
        //   u_new = (Sk - Yk) / ip, dir = -R + (Sk * -R) * u_new.
        let mut work = broyden_workspace(1, 1, 0.1);
        work.residual[0] = 1.0;
        work.delta_x[0] = 0.5;
        work.delta_residual[0] = 0.2;

        let status = work.compute_direction(1).unwrap();

        let u_new = (0.5 - 0.2) / 0.1;
        let expected = -1.0 + (0.5 * -1.0) * u_new;
        assert!((work.direction[0] - expected).abs() < 1e-12);
        // Memory of one restarts on every update.
        assert_eq!(status, DirectionStatus::CacheReset);
        assert_eq!((work.cache.cursor(), work.cache.len()), (0, 0));
    }

    #[test]
    fn restart_sequence() {
        let mut work = broyden_workspace(8, 3, 0.1);
        work.residual.fill(1.0);

        for (call, expected) in [
            (1, DirectionStatus::CacheIncremented),
            (2, DirectionStatus::CacheIncremented),
            (3, DirectionStatus::CacheReset),
            (4, DirectionStatus::CacheIncremented),
        ] {
            // A fresh nonzero pair each call.
            for i in 0..8 {
                work.delta_x[i] = 0.1 + (call * (i + 1)) as f64 * 1e-3;
                work.delta_residual[i] = 0.05 - (call + i) as f64 * 1e-3;
            }
            let status = work.compute_direction(call).unwrap();
            assert_eq!(status, expected, "status of call {}", call);

            let cursor = if status.is_reset() { 0 } else { call % 3 };
            assert_eq!(work.cache.cursor(), cursor, "cursor after call {}", call);
            assert_eq!(work.cache.len(), cursor, "len after call {}", call);
        }
    }

    #[test]
    fn powell_boundary_is_undamped() {
        // ip = theta_bar * ||Sk||^2 exactly: the >= comparison keeps theta = 1
        // and the denominator equals ip.
        let mut work = broyden_workspace(1, 1, 0.5);
        work.residual[0] = 1.0;
        work.delta_x[0] = 1.0;
        work.delta_residual[0] = 0.5; // ip = 0.5 = 0.5 * 1.0

        work.compute_direction(1).unwrap();

        let u_new = (1.0 - 0.5) / 0.5;
        let expected = -1.0 + (1.0 * -1.0) * u_new;
        assert!((work.direction[0] - expected).abs() < 1e-12);
        assert!(work.direction[0].is_finite());
    }

    #[test]
    fn powell_damping_blends_below_threshold() {
        // ip = 0.05 < 0.5 = theta_bar * ||Sk||^2 forces the damped branch:
        //   theta = (1 - theta_bar) / (1 - ip) with gamma = 1,
        //   s_tilde = theta * Yk + (1 - theta) * Sk,
        //   denom = (1 - theta) + theta * ip.
        let mut work = broyden_workspace(1, 1, 0.5);
        work.residual[0] = 2.0;
        work.delta_x[0] = 1.0;
        work.delta_residual[0] = 0.05;

        work.compute_direction(1).unwrap();

        let theta = (1.0 - 0.5) / (1.0 - 0.05);
        let s_tilde = theta * 0.05 + (1.0 - theta) * 1.0;
        let denom = (1.0 - theta) + theta * 0.05;
        let u_new = (1.0 - s_tilde) / denom;
        let expected = -2.0 + (1.0 * -2.0) * u_new;
        assert!((work.direction[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn zero_iterate_change_is_inert() {
        let mut work = broyden_workspace(2, 2, 0.1);
        work.residual.copy_from_slice(&[1.0, 2.0]);
        work.delta_x.fill(0.0);
        work.delta_residual.copy_from_slice(&[0.3, -0.1]);

        let status = work.compute_direction(1).unwrap();

        // No stored updates and a skipped derivation: dir is exactly -R.
        assert_eq!(work.direction, vec![-1.0, -2.0]);
        assert_eq!(status, DirectionStatus::CacheIncremented);
        assert_eq!(work.cache.u_slot(0), &[0.0, 0.0]);
        assert_eq!(work.cache.s_slot(0), &[0.0, 0.0]);

        // The zero pair contributes nothing to the next update.
        work.delta_x.copy_from_slice(&[0.1, 0.1]);
        work.delta_residual.copy_from_slice(&[0.05, 0.02]);
        let status = work.compute_direction(2).unwrap();
        assert_eq!(status, DirectionStatus::CacheReset);
        assert!(work.direction.iter().all(|d| d.is_finite()));
    }
}
