use satrec::{DecayedPolicy, SatrecArray, SatrecError};

mod common;

fn sample_times() -> (Vec<f64>, Vec<f64>) {
    let jd = vec![2458826.5, 2458826.5, 2458827.5, 2458828.5];
    let fr = vec![0.69339541, 0.9, 0.25, 0.0];
    (jd, fr)
}

#[test]
fn test_batch_agrees_with_single_record_calls() {
    let records = [common::iss(), common::vanguard(), common::molniya()];
    let array = SatrecArray::new(&records);
    let (jd, fr) = sample_times();
    let (error, position, velocity) = array.propagate(&jd, &fr).unwrap();

    for (i, rec) in records.iter().enumerate() {
        for j in 0..jd.len() {
            let (e, r, v) = rec.clone().propagate_at(jd[j], fr[j]);
            let sample = i * jd.len() + j;
            assert_eq!(error[sample], e, "record {i}, time {j}");
            for axis in 0..3 {
                assert_eq!(position[sample * 3 + axis], r[axis]);
                assert_eq!(velocity[sample * 3 + axis], v[axis]);
            }
        }
    }
}

#[test]
fn test_batch_rows_are_independent_of_order() {
    let forward = SatrecArray::new(&[common::iss(), common::molniya()]);
    let reversed = SatrecArray::new(&[common::molniya(), common::iss()]);
    let (jd, fr) = sample_times();
    let (_, pos_f, _) = forward.propagate(&jd, &fr).unwrap();
    let (_, pos_r, _) = reversed.propagate(&jd, &fr).unwrap();
    let row = jd.len() * 3;
    assert_eq!(pos_f[..row], pos_r[row..]);
    assert_eq!(pos_f[row..], pos_r[..row]);
}

#[test]
fn test_failed_samples_poison_only_their_row() {
    let array = SatrecArray::new(&[common::runaway_drag(), common::iss()]);
    // the drag failure needs about a day to develop
    let jd = vec![2458826.5, 2458827.5];
    let fr = vec![0.0, 0.0];
    let (error, position, velocity) = array.propagate(&jd, &fr).unwrap();

    assert_eq!(error[0], 0);
    assert_eq!(error[1], 1);
    assert!(position[0..3].iter().all(|x| x.is_finite()));
    assert!(position[3..6].iter().all(|x| x.is_nan()));
    assert!(velocity[3..6].iter().all(|x| x.is_nan()));

    // the healthy record's row is untouched by its neighbor's failure
    assert_eq!(error[2], 0);
    assert_eq!(error[3], 0);
    assert!(position[6..12].iter().all(|x| x.is_finite()));
}

#[test]
fn test_decayed_samples_follow_the_policy() {
    let array = SatrecArray::new(&[common::sub_orbital()]);
    let jd = [2458826.5];
    let fr = [0.0];

    let (error, position, _) = array.propagate(&jd, &fr).unwrap();
    assert_eq!(error, vec![6]);
    assert!(position.iter().all(|x| x.is_finite()));

    let mut position = vec![0.0; 3];
    let mut velocity = vec![0.0; 3];
    let mut error = vec![0u8; 1];
    array
        .propagate_into(
            &jd,
            &fr,
            &mut position,
            &mut velocity,
            &mut error,
            DecayedPolicy::PoisonSample,
        )
        .unwrap();
    assert_eq!(error, vec![6]);
    assert!(position.iter().all(|x| x.is_nan()));
    assert!(velocity.iter().all(|x| x.is_nan()));
}

#[test]
fn test_shape_law_rejects_before_writing() {
    let array = SatrecArray::new(&[common::iss(), common::vanguard()]);
    let (jd, fr) = sample_times();

    let mut position = vec![-1.0; 2 * 4 * 3];
    let mut velocity = vec![-1.0; 2 * 4 * 3 - 1]; // one short
    let mut error = vec![99u8; 2 * 4];
    let result = array.propagate_into(
        &jd,
        &fr,
        &mut position,
        &mut velocity,
        &mut error,
        DecayedPolicy::KeepSample,
    );
    assert_eq!(
        result.unwrap_err(),
        SatrecError::ShapeMismatch {
            buffer: "out_velocity",
            expected: 24,
            got: 23,
        }
    );
    assert!(position.iter().all(|&x| x == -1.0));
    assert!(velocity.iter().all(|&x| x == -1.0));
    assert!(error.iter().all(|&e| e == 99));
}

#[test]
fn test_single_record_propagate_into() {
    let sat = common::iss();
    let (jd, fr) = sample_times();
    let mut position = vec![0.0; 4 * 3];
    let mut velocity = vec![0.0; 4 * 3];
    let mut error = vec![0u8; 4];
    sat.propagate_into(
        &jd,
        &fr,
        &mut position,
        &mut velocity,
        &mut error,
        DecayedPolicy::KeepSample,
    )
    .unwrap();

    let array = SatrecArray::new(&[sat]);
    let (batch_error, batch_position, batch_velocity) = array.propagate(&jd, &fr).unwrap();
    assert_eq!(error, batch_error);
    assert_eq!(position, batch_position);
    assert_eq!(velocity, batch_velocity);
}
