//! The streaming R-peak detector: filter cascade, candidate gating and the
//! adaptive decision state machine.

mod blanking;
mod rr;
mod thresholds;

pub use rr::HeartRhythm;

use crate::constants::{GENERAL_DELAY, PT200MS, PT2000MS, PT360MS, PT4000MS};
use crate::signal_processing::{
    square, DerivativeFilter, HighPassFilter, LowPassFilter, MovingWindowIntegrator, PeakEmitter,
    RunningPeak,
};
use blanking::BlankWindow;
use rr::RrTracker;
use thresholds::{BandpassThresholds, IntegratedThresholds};

/// Phase of the decision state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    /// No candidate peak observed yet.
    StartUp,
    /// Collecting peak statistics over the first two seconds.
    LearnPhase1,
    /// Thresholds seeded; waiting for the first confirmed beat.
    LearnPhase2,
    /// Normal beat-to-beat operation.
    Detecting,
}

/// Streaming QRS detector over one 200 Hz ECG lead.
///
/// Feed samples one at a time through [`process_sample`]; a non-zero return
/// value reports a beat that occurred that many samples ago. All state is
/// owned by the instance, so independent streams get independent detectors.
///
/// [`process_sample`]: QrsDetector::process_sample
pub struct QrsDetector {
    lowpass: LowPassFilter,
    highpass: HighPassFilter,
    derivative: DerivativeFilter,
    integrator: MovingWindowIntegrator,
    mva_peaks: PeakEmitter,
    bp_peak: RunningPeak,
    dr_peak: RunningPeak,
    blanking: BlankWindow,

    lpf_val: i16,
    hpf_val: i16,
    drf_val: i16,
    sqf_val: u16,
    mva_val: u16,

    th_i: IntegratedThresholds,
    th_f: BandpassThresholds,
    rr: RrTracker,

    state: DetectorState,
    count_since_rr: i16,
    /// Derivative peak of the last confirmed beat, for the T-wave slope test.
    old_peak_dr: i16,

    learn_max_peak: u16,
    learn_mean_peak: u16,
    learn_mean_peak_bp: i16,

    sb_peak_i: u16,
    sb_peak_bp: i16,
    sb_peak_dr: i16,
    sb_count: i16,
}

impl QrsDetector {
    pub fn new() -> Self {
        Self {
            lowpass: LowPassFilter::new(),
            highpass: HighPassFilter::new(),
            derivative: DerivativeFilter::new(),
            integrator: MovingWindowIntegrator::new(),
            mva_peaks: PeakEmitter::new(),
            bp_peak: RunningPeak::new(),
            dr_peak: RunningPeak::new(),
            blanking: BlankWindow::new(),
            lpf_val: 0,
            hpf_val: 0,
            drf_val: 0,
            sqf_val: 0,
            mva_val: 0,
            th_i: IntegratedThresholds::default(),
            th_f: BandpassThresholds::default(),
            rr: RrTracker::new(),
            state: DetectorState::StartUp,
            count_since_rr: 0,
            old_peak_dr: 0,
            learn_max_peak: 0,
            learn_mean_peak: 0,
            learn_mean_peak_bp: 0,
            sb_peak_i: 0,
            sb_peak_bp: 0,
            sb_peak_dr: 0,
            sb_count: 0,
        }
    }

    /// Re-initialize in place; equivalent to replacing the instance with a
    /// fresh one.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Consume one ECG sample.
    ///
    /// Returns 0, or the number of samples between the detected R peak and
    /// the current input: `GENERAL_DELAY + 40` for a direct detection, plus
    /// the elapsed distance to the remembered peak for a search-back one.
    pub fn process_sample(&mut self, sample: i16) -> i16 {
        self.lpf_val = self.lowpass.process(sample);
        self.hpf_val = self.highpass.process(self.lpf_val);
        self.bp_peak.observe(self.hpf_val);

        self.drf_val = self.derivative.process(self.hpf_val);
        self.dr_peak.observe(self.drf_val);

        self.sqf_val = square(self.drf_val);
        self.mva_val = self.integrator.process(self.sqf_val);

        let peak = self.blanking.gate(self.mva_peaks.process(self.mva_val));

        self.count_since_rr += 1;

        let mut beat_delay = match self.state {
            DetectorState::StartUp | DetectorState::LearnPhase1 => {
                if peak > 0 {
                    self.learn(peak);
                }
                0
            }
            DetectorState::LearnPhase2 | DetectorState::Detecting => self.decide(peak),
        };

        if self.state == DetectorState::Detecting {
            if let Some(delay) = self.search_back() {
                beat_delay = delay;
            }
        }

        if self.count_since_rr > PT4000MS {
            log::debug!("no beat for 4 s, restarting learning");
            self.reset();
        }

        beat_delay
    }

    /// Learning phase 1: track the tallest candidate and a running mean of
    /// candidate heights on both analyzed signals. Once two seconds have
    /// passed, the next candidate seeds the thresholds and arms phase 2.
    fn learn(&mut self, peak: u16) {
        if peak > self.learn_max_peak {
            self.learn_max_peak = peak;
        }

        match self.state {
            DetectorState::StartUp => {
                self.state = DetectorState::LearnPhase1;
                self.learn_mean_peak = peak;
                self.learn_mean_peak_bp = self.bp_peak.best();
            }
            _ if self.count_since_rr < PT2000MS => {
                self.learn_mean_peak = ((self.learn_mean_peak as u32 + peak as u32) >> 1) as u16;
                self.learn_mean_peak_bp =
                    ((self.learn_mean_peak_bp as i32 + self.bp_peak.best() as i32) >> 1) as i16;
            }
            _ => {
                self.state = DetectorState::LearnPhase2;
                self.th_i.seed(self.learn_max_peak, self.learn_mean_peak);
                // The band-pass signal level seeds from the current running
                // maximum, not the learned mean.
                self.th_f.seed(self.bp_peak.best(), self.learn_mean_peak_bp);
                log::debug!(
                    "learning complete: th_i1={} th_f1={}",
                    self.th_i.th1(),
                    self.th_f.th1()
                );
            }
        }
    }

    /// Classify a gated candidate against both threshold pairs.
    fn decide(&mut self, peak: u16) -> i16 {
        if peak == 0 {
            return 0;
        }

        if peak > self.th_i.th1() && self.bp_peak.best() > self.th_f.th1() {
            if self.state == DetectorState::LearnPhase2 {
                self.th_i.update(peak, false);
                self.th_f.update(self.bp_peak.best(), false);
                self.confirm_beat();
                self.state = DetectorState::Detecting;
                log::debug!("first beat confirmed");
                return GENERAL_DELAY + PT200MS;
            }

            // Inside the refractory window, a shallow slope marks a T wave:
            // level-train it as noise and move on without a beat.
            if self.count_since_rr < PT360MS && self.dr_peak.best() < (self.old_peak_dr >> 2) {
                self.th_i.update(peak, true);
                self.th_f.update(self.bp_peak.best(), true);
                return 0;
            }

            self.th_i.update(peak, false);
            self.th_f.update(self.bp_peak.best(), false);
            self.apply_rr(self.count_since_rr);
            self.confirm_beat();
            self.clear_search_back();
            GENERAL_DELAY + PT200MS
        } else {
            self.th_i.update(peak, true);
            self.th_f.update(self.bp_peak.best(), true);

            // Remember the tallest noise peak outside the refractory window
            // together with its partners, in case search-back needs it.
            if peak > self.sb_peak_i && self.count_since_rr >= PT360MS {
                self.sb_peak_i = peak;
                self.sb_peak_bp = self.bp_peak.best();
                self.sb_peak_dr = self.dr_peak.best();
                self.sb_count = self.count_since_rr;
            }
            0
        }
    }

    /// Promote the remembered noise peak to a beat once the missed limit has
    /// passed and both stored partners clear the secondary thresholds.
    fn search_back(&mut self) -> Option<i16> {
        if self.count_since_rr <= self.rr.missed_limit() || self.sb_peak_i <= self.th_i.th2() {
            return None;
        }
        if self.sb_peak_bp <= self.th_f.th2() {
            return None;
        }

        self.th_i.update(self.sb_peak_i, false);
        self.th_f.update(self.sb_peak_bp, false);
        self.apply_rr(self.sb_count);

        self.count_since_rr -= self.sb_count;
        let delay = self.count_since_rr + GENERAL_DELAY + PT200MS;

        self.old_peak_dr = self.sb_peak_dr;
        self.dr_peak.clear();
        self.bp_peak.clear();
        self.clear_search_back();

        log::debug!("search-back beat, delay {delay}");
        Some(delay)
    }

    fn apply_rr(&mut self, qrs: i16) {
        if self.rr.update(qrs) == HeartRhythm::Irregular {
            self.th_i.relax();
            self.th_f.relax();
        }
    }

    fn confirm_beat(&mut self) {
        self.count_since_rr = 0;
        self.old_peak_dr = self.dr_peak.best();
        self.dr_peak.clear();
        self.bp_peak.clear();
    }

    fn clear_search_back(&mut self) {
        self.sb_peak_i = 0;
        self.sb_peak_bp = 0;
        self.sb_peak_dr = 0;
        self.sb_count = 0;
    }

    pub fn state(&self) -> DetectorState {
        self.state
    }

    pub fn rhythm(&self) -> HeartRhythm {
        self.rr.rhythm()
    }

    pub fn lpf_output(&self) -> i16 {
        self.lpf_val
    }

    pub fn hpf_output(&self) -> i16 {
        self.hpf_val
    }

    pub fn drf_output(&self) -> i16 {
        self.drf_val
    }

    pub fn sqf_output(&self) -> u16 {
        self.sqf_val
    }

    pub fn mva_output(&self) -> u16 {
        self.mva_val
    }

    pub fn th_i1(&self) -> u16 {
        self.th_i.th1()
    }

    pub fn th_f1(&self) -> i16 {
        self.th_f.th1()
    }

    pub fn spki(&self) -> u16 {
        self.th_i.spk()
    }

    pub fn npki(&self) -> u16 {
        self.th_i.npk()
    }

    pub fn spkf(&self) -> i16 {
        self.th_f.spk()
    }

    pub fn npkf(&self) -> i16 {
        self.th_f.npk()
    }

    /// Instantaneous heart rate in beats per minute, from the mean of the
    /// last eight intervals. `fs` is the sampling rate in Hz; a mean shorter
    /// than one second of samples yields 0.
    pub fn short_time_hr(&self, fs: i16) -> i16 {
        hr_from_mean(self.rr.recent_mean(), fs)
    }

    /// Robust heart rate in beats per minute, from the mean of the last
    /// eight in-band intervals.
    pub fn long_time_hr(&self, fs: i16) -> i16 {
        hr_from_mean(self.rr.selected_mean(), fs)
    }
}

fn hr_from_mean(mean_rr: i16, fs: i16) -> i16 {
    if fs <= 0 {
        return 0;
    }
    let periods = mean_rr / fs;
    if periods == 0 {
        0
    } else {
        60 / periods
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A detector parked in `Detecting` with known levels: th_i1 200,
    /// th_i2 100, th_f1 80, th_f2 40.
    fn detecting_detector() -> QrsDetector {
        let mut d = QrsDetector::new();
        d.state = DetectorState::Detecting;
        d.th_i.seed(1000, 800);
        d.th_f.seed(400, 320);
        d
    }

    /// Plant a rectified local maximum into a running-peak tracker.
    fn implant(rp: &mut RunningPeak, peak: i16) {
        rp.observe(peak);
        rp.observe(0);
    }

    #[test]
    fn fresh_detector_matches_reset_detector() {
        let mut a = QrsDetector::new();
        a.reset();
        let mut b = QrsDetector::new();

        for n in 0..600 {
            let x = if n % 150 == 20 { 900 } else { 0 };
            assert_eq!(a.process_sample(x), b.process_sample(x));
            assert_eq!(a.mva_output(), b.mva_output());
            assert_eq!(a.th_i1(), b.th_i1());
        }
    }

    #[test]
    fn shallow_slope_inside_refractory_is_a_t_wave() {
        let mut d = detecting_detector();
        d.count_since_rr = 60;
        d.old_peak_dr = 100;
        implant(&mut d.bp_peak, 90);
        implant(&mut d.dr_peak, 20);

        let delay = d.decide(300);

        assert_eq!(delay, 0);
        // Noise-side update only: npk 100 - 12 + 37.
        assert_eq!(d.npki(), 125);
        assert_eq!(d.spki(), 500);
        assert_eq!(d.count_since_rr, 60);
        assert_eq!(d.old_peak_dr, 100);
    }

    #[test]
    fn steep_slope_inside_refractory_is_a_beat() {
        let mut d = detecting_detector();
        d.count_since_rr = 60;
        d.old_peak_dr = 100;
        implant(&mut d.bp_peak, 90);
        implant(&mut d.dr_peak, 30);

        let delay = d.decide(300);

        assert_eq!(delay, GENERAL_DELAY + PT200MS);
        assert_eq!(d.count_since_rr, 0);
        assert_eq!(d.old_peak_dr, 30);
        assert_eq!(d.bp_peak.best(), 0);
        // spk 500 - 62 + 37 = 475; the 60-sample interval is out of band,
        // so th1 = 100 + (475 - 100) / 4 = 193 is then halved.
        assert_eq!(d.spki(), 475);
        assert_eq!(d.rhythm(), HeartRhythm::Irregular);
        assert_eq!(d.th_i1(), 193 >> 1);
    }

    #[test]
    fn slope_exactly_a_quarter_is_a_beat() {
        let mut d = detecting_detector();
        d.count_since_rr = 60;
        d.old_peak_dr = 100;
        implant(&mut d.bp_peak, 90);
        implant(&mut d.dr_peak, 25);

        assert_eq!(d.decide(300), GENERAL_DELAY + PT200MS);
    }

    #[test]
    fn sub_threshold_candidate_is_stored_for_search_back() {
        let mut d = detecting_detector();
        d.count_since_rr = 150;
        implant(&mut d.bp_peak, 60);
        implant(&mut d.dr_peak, 40);

        assert_eq!(d.decide(150), 0);

        assert_eq!(d.sb_peak_i, 150);
        assert_eq!(d.sb_peak_bp, 60);
        assert_eq!(d.sb_peak_dr, 40);
        assert_eq!(d.sb_count, 150);
    }

    #[test]
    fn candidate_inside_refractory_is_not_stored() {
        let mut d = detecting_detector();
        d.count_since_rr = 71;
        implant(&mut d.bp_peak, 60);

        assert_eq!(d.decide(150), 0);

        assert_eq!(d.sb_peak_i, 0);
        assert_eq!(d.sb_count, 0);
    }

    #[test]
    fn search_back_promotes_the_stored_peak() {
        let mut d = detecting_detector();
        d.count_since_rr = 400;
        d.sb_peak_i = 150;
        d.sb_peak_bp = 90;
        d.sb_peak_dr = 55;
        d.sb_count = 250;

        let delay = d.search_back().expect("missed limit passed");

        assert_eq!(delay, (400 - 250) + GENERAL_DELAY + PT200MS);
        assert_eq!(d.count_since_rr, 150);
        assert_eq!(d.old_peak_dr, 55);
        assert_eq!(d.sb_peak_i, 0);
        assert_eq!(d.sb_count, 0);
        // The 250-sample interval is out of band: irregular, thresholds
        // relaxed after the signal-side update.
        assert_eq!(d.rhythm(), HeartRhythm::Irregular);
        assert_eq!(d.spki(), 456);
        assert_eq!(d.th_i1(), 189 >> 1);
        assert_eq!(d.spkf(), 186);
        assert_eq!(d.th_f1(), 76 >> 1);
    }

    #[test]
    fn search_back_needs_both_partners() {
        let mut d = detecting_detector();
        d.count_since_rr = 400;
        d.sb_peak_i = 150;
        d.sb_peak_bp = 30; // below th_f2 = 40
        d.sb_count = 250;

        assert!(d.search_back().is_none());
        // The stored peak stays armed for a later threshold relaxation.
        assert_eq!(d.sb_peak_i, 150);
        assert_eq!(d.count_since_rr, 400);
    }

    #[test]
    fn search_back_waits_for_the_missed_limit() {
        let mut d = detecting_detector();
        d.count_since_rr = 332;
        d.sb_peak_i = 150;
        d.sb_peak_bp = 90;
        d.sb_count = 250;

        assert!(d.search_back().is_none());

        d.count_since_rr = 333;
        assert!(d.search_back().is_some());
    }

    #[test]
    fn zero_input_never_leaves_startup() {
        let mut d = QrsDetector::new();

        for _ in 0..1000 {
            assert_eq!(d.process_sample(0), 0);
        }

        assert_eq!(d.state(), DetectorState::StartUp);
        assert_eq!(d.spki(), 0);
        assert_eq!(d.th_i1(), 0);
    }

    #[test]
    fn stall_restarts_learning() {
        let mut d = QrsDetector::new();

        // Park a candidate so the detector leaves StartUp.
        for n in 0..300 {
            let x = if n == 100 { 800 } else { 0 };
            d.process_sample(x);
        }
        assert_eq!(d.state(), DetectorState::LearnPhase1);

        // Four beat-free seconds wipe everything: the restart fires on
        // sample 801 and the silent count climbs again from there.
        for _ in 0..600 {
            d.process_sample(0);
        }
        assert_eq!(d.state(), DetectorState::StartUp);
        assert_eq!(d.count_since_rr, 99);
        assert_eq!(d.learn_max_peak, 0);
    }

    #[test]
    fn secondary_thresholds_track_their_primaries() {
        let mut d = QrsDetector::new();

        // A regular train never takes the irregular path, so the halved
        // pair is re-derived on every level update.
        for n in 0..3000 {
            let x = if n % 200 == 0 { 1000 } else { 0 };
            d.process_sample(x);
            assert_eq!(d.th_i.th2(), d.th_i.th1() >> 1);
            assert_eq!(d.th_f.th2(), d.th_f.th1() >> 1);
        }
        assert_eq!(d.state(), DetectorState::Detecting);
    }

    #[test]
    fn count_since_rr_stays_bounded() {
        let mut d = QrsDetector::new();

        for n in 0..5000 {
            let x = if n % 700 == 350 { 700 } else { 0 };
            d.process_sample(x);
            assert!((0..=PT4000MS).contains(&d.count_since_rr));
        }
    }
}
