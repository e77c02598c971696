//! Property tests for the heading math and zone resolution.

use proptest::prelude::*;
use tam_common::hal::types::Side;
use tam_game::ball::{reflect_off_paddle, reflect_off_wall};
use tam_game::config::RulesConfig;
use tam_game::game::rally::{Field, RallyMarkers, Touch, Zone, paddle_contact};

fn heads_toward_player2(angle: f64) -> bool {
    angle.to_radians().cos() > 0.0
}

proptest! {
    #[test]
    fn paddle_sends_the_ball_back(
        incoming in -360.0f64..360.0,
        share in 0.0f64..=1.0,
        width in 1.0f64..400.0,
    ) {
        prop_assume!(incoming.to_radians().cos().abs() > 1e-6);
        let outgoing = reflect_off_paddle(incoming, share * width, width);

        prop_assert_ne!(heads_toward_player2(incoming), heads_toward_player2(outgoing));
        // Deviation from the horizontal never exceeds the bounce limit.
        let deviation = outgoing.to_radians().sin().asin().to_degrees().abs();
        prop_assert!(deviation <= 70.0 + 1e-9);
    }

    #[test]
    fn wall_bounce_is_an_involution(angle in -720.0f64..720.0) {
        let back = reflect_off_wall(reflect_off_wall(angle));
        prop_assert!((back - angle).abs() < 1e-9);

        let bounced = reflect_off_wall(angle).to_radians();
        let rad = angle.to_radians();
        prop_assert!((bounced.cos() - rad.cos()).abs() < 1e-9);
        prop_assert!((bounced.sin() + rad.sin()).abs() < 1e-9);
    }

    #[test]
    fn contact_is_inside_the_widened_paddle(
        y in -50i32..900,
        pos in 0.0f64..700.0,
        width in 1.0f64..200.0,
        tol in 0i32..20,
    ) {
        match paddle_contact(y, pos, width, tol) {
            Some(contact) => {
                prop_assert!(contact > -(tol as f64) - 1e-9);
                prop_assert!(contact < width + tol as f64 + 1e-9);
            }
            None => {
                let y = y as f64;
                prop_assert!(y <= pos - tol as f64 || y >= pos + width + tol as f64);
            }
        }
    }

    #[test]
    fn last_paddle_edge_stays_disarmed(
        x in -20i32..960,
        y in 20i32..830,
    ) {
        let field = Field::new(940.0, 856.0, &RulesConfig::default());
        let mut markers = RallyMarkers::new();
        markers.record(Touch::Paddle(Side::Player1));
        markers.record(Touch::UpperWall);

        prop_assert_ne!(field.zone(&markers, x, y), Some(Zone::Edge(Side::Player1)));
    }
}
