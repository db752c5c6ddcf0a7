#[cfg(test)]
mod tests {
    use rhein_core::chart::{Judgement, Note};
    use rhein_core::gameplay::judge::{deviation_ms, JudgeMachine};
    use rhein_core::gameplay::timing::TimingWindows;

    // bpm 120: one beat is 0.5 s
    const BPM: f64 = 120.0;

    fn create_test_judge() -> JudgeMachine {
        // Lane 1: beats 2 and 4 (1.0 s, 2.0 s), lane 2: beat 3 (1.5 s)
        let mut judge = JudgeMachine::new(4, TimingWindows::DEFAULT);
        judge.load(vec![
            Note::new(1, 2.0, 0.0),
            Note::new(2, 3.0, 0.0),
            Note::new(1, 4.0, 0.0),
        ]);
        judge
    }

    fn press(lanes: &'static [usize]) -> impl Fn(usize) -> bool {
        move |lane| lanes.contains(&lane)
    }

    #[test]
    fn test_marvelous_judgment() {
        let mut judge = create_test_judge();

        let results = judge.process_tick(1.0, BPM, press(&[1]));

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].lane, 1);
        assert_eq!(results[0].judgement, Judgement::Marvelous);
        assert_eq!(results[0].deviance_ms, Some(0));
        assert!(results[0].note.is_calculated());
        assert_eq!(judge.lanes()[1].len(), 1);
    }

    #[test]
    fn test_late_good_judgment() {
        let mut judge = create_test_judge();

        // +100 ms
        let results = judge.process_tick(1.1, BPM, press(&[1]));

        assert_eq!(results[0].judgement, Judgement::Good);
        assert_eq!(results[0].deviance_ms, Some(100));
        let dev = results[0].note.deviance().unwrap();
        assert!((dev - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_early_okay_judgment() {
        let mut judge = create_test_judge();

        // -120 ms
        let results = judge.process_tick(0.88, BPM, press(&[1]));

        assert_eq!(results[0].judgement, Judgement::Okay);
        assert_eq!(results[0].deviance_ms, Some(-120));
    }

    #[test]
    fn test_ignored_input_too_early() {
        let mut judge = create_test_judge();

        // -500 ms, out of reach
        let results = judge.process_tick(0.5, BPM, press(&[1]));

        assert!(results.is_empty());
        assert_eq!(judge.remaining(), 3);
        assert!(!judge.lanes()[1].peek().unwrap().is_judged());
    }

    #[test]
    fn test_expired_notes_are_destroyed() {
        let mut judge = create_test_judge();

        // 1.166 s is still on the miss edge
        assert!(judge.process_tick(1.166, BPM, press(&[])).is_empty());

        let results = judge.process_tick(1.167, BPM, press(&[]));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].judgement, Judgement::Miss);
        assert_eq!(results[0].deviance_ms, None);
        assert!(results[0].note.is_destroyed());
        assert!(!results[0].note.is_calculated());

        // Not reported again
        assert!(judge.process_tick(1.2, BPM, press(&[])).is_empty());

        // Lane 2 (1.5 s) and lane 1 (2.0 s) both expire by 2.2 s, one per lane
        let results = judge.process_tick(2.2, BPM, press(&[]));
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].lane, 1);
        assert_eq!(results[1].lane, 2);
        assert!(judge.is_empty());
    }

    #[test]
    fn test_press_does_not_save_an_expired_note() {
        let mut judge = create_test_judge();

        let results = judge.process_tick(1.2, BPM, press(&[1]));

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].judgement, Judgement::Miss);
        assert!(results[0].note.is_destroyed());
        // the press is spent on the expiry, the next note stays
        assert_eq!(judge.lanes()[1].len(), 1);
    }

    #[test]
    fn test_one_judgement_per_lane_per_tick() {
        let mut judge = JudgeMachine::new(1, TimingWindows::DEFAULT);
        judge.load(vec![Note::new(0, 2.0, 0.0), Note::new(0, 2.0, 0.0)]);

        let results = judge.process_tick(1.0, BPM, press(&[0]));
        assert_eq!(results.len(), 1);
        assert_eq!(judge.remaining(), 1);

        let results = judge.process_tick(1.0, BPM, press(&[0]));
        assert_eq!(results.len(), 1);
        assert!(judge.is_empty());
    }

    #[test]
    fn test_lane_independence() {
        let mut judge = create_test_judge();

        // Both keys down at 1.0 s: lane 2 (1.5 s) is out of reach and stays
        let results = judge.process_tick(1.0, BPM, press(&[1, 2]));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].lane, 1);
        assert_eq!(judge.lanes()[2].len(), 1);

        let results = judge.process_tick(1.5, BPM, press(&[2]));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].lane, 2);
        assert_eq!(results[0].judgement, Judgement::Marvelous);

        let results = judge.process_tick(2.01, BPM, press(&[1]));
        assert_eq!(results[0].judgement, Judgement::Marvelous);
        assert!(judge.is_empty());
    }

    #[test]
    fn test_deviation_rounds_to_nearest_ms() {
        assert_eq!(deviation_ms(1.0304, 1.0), 30);
        assert_eq!(deviation_ms(1.0306, 1.0), 31);
        assert_eq!(deviation_ms(0.9694, 1.0), -31);
    }

    #[test]
    fn test_strict_windows_shrink_reach() {
        let mut judge = JudgeMachine::new(1, TimingWindows::STRICT);
        judge.load(vec![Note::new(0, 2.0, 0.0)]);

        // 160 ms late: still hittable with default windows, gone with strict
        let results = judge.process_tick(1.16, BPM, press(&[0]));
        assert_eq!(results[0].judgement, Judgement::Miss);
        assert!(results[0].note.is_destroyed());
    }

    #[test]
    fn test_already_judged_head_is_discarded() {
        let mut judge = JudgeMachine::new(4, TimingWindows::DEFAULT);
        let mut stale = Note::new(0, 2.0, 0.0);
        assert!(stale.calculate(0.01));
        judge.load(vec![stale, Note::new(0, 4.0, 0.0)]);

        // Past the miss window of the stale note: no second judgement for it
        let results = judge.process_tick(1.5, BPM, |_| false);
        assert!(results.is_empty());
        assert_eq!(judge.lanes()[0].len(), 1);

        // The next note is judged normally on a later tick
        let results = judge.process_tick(2.0, BPM, press(&[0]));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].judgement, Judgement::Marvelous);
        assert!(judge.is_empty());
    }
}
