//! HMM-based Chinese OOV segmenter (§4.5), used to re-segment runs of
//! single-character DAG fallback tokens that may actually be multi-character
//! named entities the dictionary never saw.

use std::collections::HashMap;

const NEG_INF: f64 = f64::NEG_INFINITY;
const EMIT_FLOOR: f64 = -3.14e100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum State {
    B,
    M,
    E,
    S,
}

const STATES: [State; 4] = [State::B, State::M, State::E, State::S];

fn state_index(s: State) -> usize {
    match s {
        State::B => 0,
        State::M => 1,
        State::E => 2,
        State::S => 3,
    }
}

/// Trained (or built-in default) HMM parameters. All values are natural-log
/// probabilities; `emit` is a direct codepoint map rather than a trie since
/// per-state emission has no prefix structure to exploit.
pub struct HmmModel {
    start: [f64; 4],
    trans: [[f64; 4]; 4],
    emit: [HashMap<char, f64>; 4],
}

impl HmmModel {
    /// Built-in defaults (§4.5): used whenever no trained parameter file is
    /// loaded. Not linguistically tuned — they exist so the HMM OOV path
    /// produces *a* segmentation rather than requiring external data.
    pub fn default_model() -> Self {
        let start = [-0.26, NEG_INF, NEG_INF, -1.46];

        // Allowed edges only: B->{M,E}, M->{M,E}, E->{B,S}, S->{B,S}.
        let mut trans = [[NEG_INF; 4]; 4];
        let b = state_index(State::B);
        let m = state_index(State::M);
        let e = state_index(State::E);
        let s = state_index(State::S);
        trans[b][m] = -1.26;
        trans[b][e] = -0.32;
        trans[m][m] = -0.8;
        trans[m][e] = -0.6;
        trans[e][b] = -0.5;
        trans[e][s] = -0.9;
        trans[s][b] = -0.6;
        trans[s][s] = -0.8;

        HmmModel {
            start,
            trans,
            emit: [HashMap::new(), HashMap::new(), HashMap::new(), HashMap::new()],
        }
    }

    /// Install trained emission log-probabilities for a state's characters,
    /// overwriting any existing entries for `state`.
    pub fn set_emissions(&mut self, state_b: bool, state_m: bool, state_e: bool, state_s: bool, table: &[(char, f64)]) {
        let flags = [state_b, state_m, state_e, state_s];
        for (idx, &enabled) in flags.iter().enumerate() {
            if enabled {
                self.emit[idx] = table.iter().cloned().collect();
            }
        }
    }

    fn emit_prob(&self, state: State, ch: char) -> f64 {
        *self.emit[state_index(state)].get(&ch).unwrap_or(&EMIT_FLOOR)
    }
}

impl Default for HmmModel {
    fn default() -> Self {
        Self::default_model()
    }
}

impl HmmModel {
    fn state_from_label(label: &str) -> Option<State> {
        match label {
            "B" => Some(State::B),
            "M" => Some(State::M),
            "E" => Some(State::E),
            "S" => Some(State::S),
            _ => None,
        }
    }

    /// Overwrite one state's start log-probability, keyed by its TSV label
    /// (`B`/`M`/`E`/`S`). Unrecognized labels are ignored.
    pub fn set_start_prob(&mut self, state: &str, log_prob: f64) {
        if let Some(s) = Self::state_from_label(state) {
            self.start[state_index(s)] = log_prob;
        }
    }

    /// Overwrite one transition edge's log-probability.
    pub fn set_transition_prob(&mut self, from: &str, to: &str, log_prob: f64) {
        if let (Some(f), Some(t)) = (Self::state_from_label(from), Self::state_from_label(to)) {
            self.trans[state_index(f)][state_index(t)] = log_prob;
        }
    }

    /// Overwrite one state's emission log-probability for a single character.
    pub fn set_emission_prob(&mut self, state: &str, ch: char, log_prob: f64) {
        if let Some(s) = Self::state_from_label(state) {
            self.emit[state_index(s)].insert(ch, log_prob);
        }
    }
}

/// Viterbi-decode `text` into a B/M/E/S state sequence, one state per char.
fn viterbi(model: &HmmModel, chars: &[char]) -> Vec<State> {
    let n = chars.len();
    if n == 0 {
        return Vec::new();
    }

    let mut v = vec![[NEG_INF; 4]; n];
    let mut back = vec![[0usize; 4]; n];

    for &s in &STATES {
        let si = state_index(s);
        v[0][si] = model.start[si] + model.emit_prob(s, chars[0]);
    }

    for t in 1..n {
        for &s in &STATES {
            let si = state_index(s);
            let mut best = NEG_INF;
            let mut best_prev = 0;
            for &sp in &STATES {
                let spi = state_index(sp);
                let score = v[t - 1][spi] + model.trans[spi][si];
                if score > best {
                    best = score;
                    best_prev = spi;
                }
            }
            v[t][si] = best + model.emit_prob(s, chars[t]);
            back[t][si] = best_prev;
        }
    }

    let mut best_last = 0;
    let mut best_score = NEG_INF;
    for &s in &STATES {
        let si = state_index(s);
        if v[n - 1][si] > best_score {
            best_score = v[n - 1][si];
            best_last = si;
        }
    }

    let mut path_idx = vec![0usize; n];
    path_idx[n - 1] = best_last;
    for t in (1..n).rev() {
        path_idx[t - 1] = back[t][path_idx[t]];
    }

    path_idx
        .into_iter()
        .map(|idx| STATES[idx])
        .collect()
}

/// Segment `text` (assumed to be a run of Chinese characters with no
/// dictionary-backed multi-character matches) into words by HMM state path.
/// A word boundary closes after every E or S state.
pub fn segment(model: &HmmModel, text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let states = viterbi(model, &chars);

    let mut words = Vec::new();
    let mut current = String::new();
    for (ch, state) in chars.iter().zip(states.iter()) {
        current.push(*ch);
        if matches!(state, State::E | State::S) {
            words.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_character_defaults_to_s_state() {
        let model = HmmModel::default_model();
        let words = segment(&model, "好");
        assert_eq!(words, vec!["好".to_string()]);
    }

    #[test]
    fn every_character_is_accounted_for() {
        let model = HmmModel::default_model();
        let words = segment(&model, "北京欢迎你");
        let total: String = words.concat();
        assert_eq!(total, "北京欢迎你");
    }

    #[test]
    fn empty_text_segments_to_nothing() {
        let model = HmmModel::default_model();
        assert!(segment(&model, "").is_empty());
    }

    #[test]
    fn trained_emissions_override_defaults() {
        let mut model = HmmModel::default_model();
        model.set_emissions(true, false, false, false, &[('京', -0.1)]);
        assert_eq!(model.emit_prob(State::B, '京'), -0.1);
        assert_eq!(model.emit_prob(State::B, '未'), EMIT_FLOOR);
    }
}
