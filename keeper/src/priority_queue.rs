//! Priority queue of tokens by graduation progress (max-heap)

use launchpad_common::Address;
use launchpad_curve::Phase;
use priority_queue::PriorityQueue;
use std::cmp::Reverse;
use std::collections::HashMap;

/// Progress snapshot of one token
#[derive(Debug, Clone)]
pub struct TokenProgress {
    pub token: Address,
    /// Progress toward the threshold (10,000 = ready)
    pub progress_bps: u16,
    pub okb_collected: u128,
    pub phase: Phase,
    /// Tick of the snapshot
    pub last_update: u64,
}

impl TokenProgress {
    /// Threshold reached, or stuck mid-graduation
    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Graduating
            || (self.phase == Phase::Active && self.progress_bps >= 10_000)
    }

    /// Close enough to the threshold to watch
    pub fn near_threshold(&self, watch_bps: u16) -> bool {
        self.phase == Phase::Active && self.progress_bps >= watch_bps && self.progress_bps < 10_000
    }

    /// Tokens stuck in `Graduating` sort ahead of everything else; ties go
    /// to the lower address
    fn priority(&self) -> (u32, Reverse<Address>) {
        let rank = match self.phase {
            Phase::Graduating => u32::MAX,
            _ => self.progress_bps as u32,
        };
        (rank, Reverse(self.token))
    }
}

/// Progress-ordered queue: highest progress first
pub struct GraduationQueue {
    queue: PriorityQueue<Address, (u32, Reverse<Address>)>,
    /// Map for O(1) lookups
    map: HashMap<Address, TokenProgress>,
}

impl GraduationQueue {
    pub fn new() -> Self {
        Self {
            queue: PriorityQueue::new(),
            map: HashMap::new(),
        }
    }

    /// Push or update a token
    pub fn push(&mut self, progress: TokenProgress) {
        let token = progress.token;
        let priority = progress.priority();
        self.map.insert(token, progress);
        self.queue.push(token, priority);
    }

    pub fn peek(&self) -> Option<&TokenProgress> {
        let (token, _priority) = self.queue.peek()?;
        self.map.get(token)
    }

    pub fn remove(&mut self, token: &Address) -> Option<TokenProgress> {
        self.queue.remove(token);
        self.map.remove(token)
    }

    pub fn contains(&self, token: &Address) -> bool {
        self.map.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Ready tokens in queue order, highest priority first
    pub fn ready(&self) -> Vec<TokenProgress> {
        self.queue
            .clone()
            .into_sorted_iter()
            .filter_map(|(token, _priority)| self.map.get(&token))
            .filter(|p| p.is_ready())
            .cloned()
            .collect()
    }

    pub fn near_threshold(&self, watch_bps: u16) -> Vec<TokenProgress> {
        self.map
            .values()
            .filter(|p| p.near_threshold(watch_bps))
            .cloned()
            .collect()
    }
}

impl Default for GraduationQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_progress(idx: u8, progress_bps: u16, phase: Phase) -> TokenProgress {
        TokenProgress {
            token: Address::repeat_byte(idx),
            progress_bps,
            okb_collected: progress_bps as u128,
            phase,
            last_update: 0,
        }
    }

    #[test]
    fn test_queue_order() {
        let mut queue = GraduationQueue::new();

        queue.push(make_progress(1, 5_000, Phase::Active));
        queue.push(make_progress(2, 9_000, Phase::Active));
        queue.push(make_progress(3, 1_000, Phase::Active));

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.peek().unwrap().progress_bps, 9_000);
        queue.remove(&Address::repeat_byte(2));
        assert_eq!(queue.peek().unwrap().progress_bps, 5_000);
    }

    #[test]
    fn test_graduating_first() {
        let mut queue = GraduationQueue::new();

        queue.push(make_progress(1, 10_000, Phase::Active));
        queue.push(make_progress(2, 10_000, Phase::Graduating));

        let peeked = queue.peek().unwrap();
        assert_eq!(peeked.phase, Phase::Graduating);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_ready_tokens() {
        let mut queue = GraduationQueue::new();

        queue.push(make_progress(1, 10_000, Phase::Active));
        queue.push(make_progress(2, 9_999, Phase::Active));
        queue.push(make_progress(3, 10_000, Phase::Graduating));
        queue.push(make_progress(4, 10_000, Phase::Graduated));

        let ready = queue.ready();
        assert_eq!(ready.len(), 2);
        assert_eq!(ready[0].token, Address::repeat_byte(3));
        assert_eq!(ready[1].token, Address::repeat_byte(1));
    }

    #[test]
    fn test_ready_ties_by_address() {
        let mut queue = GraduationQueue::new();

        queue.push(make_progress(9, 10_000, Phase::Graduating));
        queue.push(make_progress(4, 10_000, Phase::Graduating));
        queue.push(make_progress(6, 10_000, Phase::Active));
        queue.push(make_progress(5, 10_000, Phase::Active));

        let order: Vec<Address> = queue.ready().into_iter().map(|p| p.token).collect();
        assert_eq!(
            order,
            vec![
                Address::repeat_byte(4),
                Address::repeat_byte(9),
                Address::repeat_byte(5),
                Address::repeat_byte(6),
            ]
        );
    }

    #[test]
    fn test_near_threshold() {
        let mut queue = GraduationQueue::new();

        queue.push(make_progress(1, 8_500, Phase::Active));
        queue.push(make_progress(2, 6_000, Phase::Active));
        queue.push(make_progress(3, 10_000, Phase::Active));

        let near = queue.near_threshold(8_000);
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].progress_bps, 8_500);
    }

    #[test]
    fn test_queue_update() {
        let mut queue = GraduationQueue::new();
        let token = Address::repeat_byte(7);

        queue.push(make_progress(7, 2_000, Phase::Active));
        queue.push(make_progress(7, 10_000, Phase::Graduating));

        assert_eq!(queue.len(), 1);
        assert_eq!(queue.peek().unwrap().phase, Phase::Graduating);
        assert!(queue.remove(&token).is_some());
        assert!(!queue.contains(&token));
    }
}
