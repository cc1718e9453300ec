// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use salesdash_app::{Client, Deal, DealStatus, SalesRep, SalesRepId};

const FIRST_NAMES: [&str; 16] = [
    "Alice", "Bob", "Charlie", "Dana", "Evan", "Fatima", "Grace", "Hiro", "Isabel", "Jamal",
    "Keiko", "Liam", "Mei", "Noah", "Olivia", "Priya",
];
const LAST_NAMES: [&str; 16] = [
    "Johnson", "Smith", "Lee", "Garcia", "Nakamura", "Okafor", "Müller", "Patel", "Rossi",
    "Silva", "Kowalski", "Chen", "Dubois", "Larsen", "Haddad", "Novak",
];

const ROLES: [&str; 6] = [
    "Account Executive",
    "Senior Account Executive",
    "Sales Development Rep",
    "Sales Manager",
    "Regional Director",
    "Solutions Consultant",
];

const REGIONS: [&str; 6] = [
    "North America",
    "South America",
    "Europe",
    "Asia-Pacific",
    "Middle East",
    "Africa",
];

const SKILLS: [&str; 12] = [
    "Negotiation",
    "CRM",
    "Client Relations",
    "Forecasting",
    "Lead Generation",
    "Product Demos",
    "Cold Calling",
    "Contract Law",
    "Public Speaking",
    "Pipeline Management",
    "Market Research",
    "Team Leadership",
];

const COMPANY_PREFIXES: [&str; 12] = [
    "Acme", "Globex", "Initech", "Umbrella", "Stark", "Wayne", "Hooli", "Vandelay", "Soylent",
    "Tyrell", "Cyberdyne", "Wonka",
];
const COMPANY_SUFFIXES: [&str; 5] = ["Corp", "Industries", "Labs", "Holdings", "Group"];

const INDUSTRIES: [&str; 8] = [
    "Manufacturing",
    "Retail",
    "Healthcare",
    "Finance",
    "Logistics",
    "Energy",
    "Technology",
    "Education",
];

const OPEN_STATUSES: [&str; 3] = ["In Progress", "Negotiation", "Proposal Sent"];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded generator for demo sales reps. The same seed always yields the
/// same sequence of reps.
#[derive(Debug, Clone)]
pub struct RepFaker {
    rng: DeterministicRng,
    next_id: i64,
}

impl RepFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_id: 1,
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    /// Generates the next rep, assigning ids sequentially from 1.
    pub fn sales_rep(&mut self) -> SalesRep {
        let id = self.next_id;
        self.next_id += 1;

        let name = format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES));
        let clients: Vec<Client> = (0..self.int_range(1, 3)).map(|_| self.client()).collect();
        let deals = clients
            .iter()
            .map(|client| self.deal_for(&client.name))
            .collect();

        SalesRep {
            id: SalesRepId::new(id),
            name,
            role: self.pick(&ROLES).to_owned(),
            region: self.pick(&REGIONS).to_owned(),
            skills: self.skills(),
            deals,
            clients,
        }
    }

    pub fn sales_reps(&mut self, count: usize) -> Vec<SalesRep> {
        (0..count).map(|_| self.sales_rep()).collect()
    }

    pub fn client(&mut self) -> Client {
        let name = format!(
            "{} {}",
            self.pick(&COMPANY_PREFIXES),
            self.pick(&COMPANY_SUFFIXES)
        );
        let domain = name
            .split_whitespace()
            .next()
            .unwrap_or("client")
            .to_ascii_lowercase();
        let contact_first = self.pick(&FIRST_NAMES).to_ascii_lowercase();
        Client {
            contact: format!("{contact_first}@{domain}.com"),
            industry: self.pick(&INDUSTRIES).to_owned(),
            name,
        }
    }

    pub fn deal_for(&mut self, client: &str) -> Deal {
        let status = match self.rng.int_n(3) {
            0 => DealStatus::ClosedWon,
            1 => DealStatus::ClosedLost,
            _ => DealStatus::InProgress(self.pick(&OPEN_STATUSES).to_owned()),
        };
        Deal {
            client: client.to_owned(),
            value: (self.int_range(5, 250) * 1_000) as f64,
            status,
        }
    }

    fn skills(&mut self) -> Vec<String> {
        let count = self.int_range(1, 4) as usize;
        let mut picked: Vec<String> = Vec::with_capacity(count);
        while picked.len() < count {
            let skill = self.pick(&SKILLS);
            if !picked.iter().any(|existing| existing == skill) {
                picked.push(skill.to_owned());
            }
        }
        picked
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }
}
