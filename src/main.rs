use aho_corasick::AhoCorasick;
use arrayvec::ArrayVec;
use itertools::{Itertools, MinMaxResult};
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};
use std::iter::zip;
use std::ops::{Range, RangeInclusive};
use thiserror::Error;

const DIGIT_PATTERNS: [&str; 18] = [
    "1", "2", "3", "4", "5", "6", "7", "8", "9",
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine"
];

fn day1(part: u8, lines: &[String]) -> String {
    let patterns = if part == 1 {&DIGIT_PATTERNS[.. 9]} else {&DIGIT_PATTERNS[..]};
    // overlapping search, so "eightwo" yields both words
    let digits = AhoCorasick::new(patterns).unwrap();
    lines.iter().map(|line| {
        let (first, last) = match digits.find_overlapping_iter(line.as_str()).minmax_by_key(|m| m.start()) {
            MinMaxResult::NoElements => return 0,
            MinMaxResult::OneElement(m) => (m, m),
            MinMaxResult::MinMax(first, last) => (first, last)
        };
        let value = |m: aho_corasick::Match| (m.pattern().as_usize() % 9 + 1) as u32;
        value(first) * 10 + value(last)
    }).sum::<u32>().to_string()
}

////////////////////////////////////////////////////////////////////////////////

// red, green, blue
const CUBE_LIMITS: [u64; 3] = [12, 13, 14];

#[derive(Debug)]
struct Game {id: u64, rounds: Vec<[u64; 3]>}

impl Game {
    fn parse(line: &str) -> Game {
        let Some((head, rounds)) = line.split_once(": ") else {panic!("cannot parse game {}", line)};
        let id = head.strip_prefix("Game ").and_then(|id| id.parse().ok())
            .unwrap_or_else(|| panic!("cannot parse game id in {}", line));
        let rounds = rounds.split("; ").map(|round| {
            let mut counts = [0; 3];
            for cubes in round.split(", ") {
                let Some((count, color)) = cubes.split_once(' ') else {
                    panic!("cannot parse cubes '{}' in {}", cubes, line)
                };
                let ix = match color {
                    "red" => 0, "green" => 1, "blue" => 2,
                    _ => panic!("unexpected color {} in {}", color, line)
                };
                counts[ix] = count.parse::<u64>().expect(count);
            }
            counts
        }).collect();
        Game {id, rounds}
    }

    fn is_possible(&self) -> bool {
        self.rounds.iter().all(|round| zip(round, CUBE_LIMITS).all(|(&count, limit)| count <= limit))
    }

    fn min_set(&self) -> [u64; 3] {
        self.rounds.iter().fold([0; 3], |min_set, round|
            std::array::from_fn(|ix| min_set[ix].max(round[ix]))
        )
    }
}

fn day2(part: u8, lines: &[String]) -> String {
    let games = lines.iter().map(|line| Game::parse(line));
    if part == 1 {
        games.filter(Game::is_possible).map(|game| game.id).sum::<u64>().to_string()
    } else {
        games.map(|game| game.min_set().iter().product::<u64>()).sum::<u64>().to_string()
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug)]
struct NumberToken {row: usize, cols: Range<usize>, value: u64}

fn number_tokens(lines: &[String]) -> Vec<NumberToken> {
    let digit_run = Regex::new(r"[0-9]+").unwrap();
    lines.iter().enumerate().flat_map(|(row, line)|
        digit_run.find_iter(line).map(move |m| NumberToken {
            row, cols: m.range(), value: m.as_str().parse().expect(m.as_str())
        })
    ).collect()
}

fn token_neighbors<'a>(grid: &'a [&'a [u8]], token: &NumberToken)
    -> impl Iterator<Item = (usize, usize, u8)> + 'a
{
    let cols: RangeInclusive<usize> = token.cols.start.saturating_sub(1) ..= token.cols.end;
    (token.row.saturating_sub(1) ..= token.row + 1).flat_map(move |ri|
        cols.clone().filter_map(move |ci| grid.get(ri)?.get(ci).map(|&cell| (ri, ci, cell)))
    )
}

fn is_symbol(cell: u8) -> bool {!cell.is_ascii_digit() && cell != b'.'}

fn day3(part: u8, lines: &[String]) -> String {
    let grid = lines.iter().map(|line| line.as_bytes()).collect::<Vec<_>>();
    let tokens = number_tokens(lines);
    if part == 1 {
        tokens.iter().filter(|token|
            token_neighbors(&grid, token).any(|(_, _, cell)| is_symbol(cell))
        ).map(|token| token.value).sum::<u64>().to_string()
    } else {
        // a cell has at most six distinct digit runs around it
        let mut gears: FxHashMap<(usize, usize), ArrayVec<u64, 6>> = FxHashMap::default();
        for token in &tokens {
            for (ri, ci, cell) in token_neighbors(&grid, token) {
                if cell == b'*' {gears.entry((ri, ci)).or_default().push(token.value)}
            }
        }
        gears.values().filter_map(|values| match values[..] {
            [left, right] => Some(left * right),
            _ => None
        }).sum::<u64>().to_string()
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug)]
struct Card {winning: Vec<usize>, owned: Vec<usize>}

impl Card {
    fn parse(line: &str) -> Card {
        let Some((_, numbers)) = line.split_once(": ") else {panic!("cannot parse card {}", line)};
        let Some((winning, owned)) = numbers.split_once(" | ") else {
            panic!("cannot split numbers of card {}", line)
        };
        let parse_numbers = |numbers: &str| -> Vec<usize> {
            numbers.split_whitespace().map(|n| n.parse().expect(n)).collect()
        };
        Card {winning: parse_numbers(winning), owned: parse_numbers(owned)}
    }

    fn matches(&self) -> usize {
        let winning = self.winning.iter().collect::<FxHashSet<_>>();
        self.owned.iter().unique().filter(|n| winning.contains(n)).count()
    }
}

fn score(matches: usize) -> u64 {
    if matches == 0 {0} else {1 << (matches - 1)}
}

fn total_copies(matches: &[usize]) -> u64 {
    let mut copies = vec![1u64; matches.len()];
    for ci in 0 .. matches.len() {
        let won = copies[ci];
        for copy in copies.iter_mut().skip(ci + 1).take(matches[ci]) {*copy += won}
    }
    copies.iter().sum()
}

fn day4(part: u8, lines: &[String]) -> String {
    let matches = lines.iter().map(|line| Card::parse(line).matches()).collect::<Vec<_>>();
    if part == 1 {
        matches.iter().map(|&m| score(m)).sum::<u64>().to_string()
    } else {
        total_copies(&matches).to_string()
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RangeMapping {dest: u64, src: u64, len: u64}

impl RangeMapping {
    fn covers(&self, value: u64) -> bool {value >= self.src && value - self.src < self.len}
}

#[derive(Clone, Debug, Default)]
struct RangeMap {ranges: Vec<RangeMapping>}

impl RangeMap {
    fn apply(&self, value: u64) -> u64 {self.apply_run(value).0}

    /// Maps `value`, also returning how many consecutive values starting at `value`
    /// are shifted by the same offset. Unmapped values run up to the next range start.
    fn apply_run(&self, value: u64) -> (u64, u64) {
        let found = self.ranges.iter().position(|range| range.covers(value));
        let until_shadowed = self.ranges[.. found.unwrap_or(self.ranges.len())].iter()
            .filter(|range| range.src > value)
            .map(|range| range.src - value)
            .min().unwrap_or(u64::MAX);
        match found {
            Some(ix) => {
                let range = self.ranges[ix];
                let offset = value - range.src;
                (range.dest + offset, until_shadowed.min(range.len - offset))
            },
            None => (value, until_shadowed)
        }
    }

    fn inverse(&self) -> RangeMap {
        RangeMap {ranges: self.ranges.iter().map(|range|
            RangeMapping {dest: range.src, src: range.dest, len: range.len}
        ).collect()}
    }
}

#[derive(Debug)]
struct Almanac {seeds: Vec<u64>, maps: Vec<RangeMap>}

impl Almanac {
    fn parse(lines: &[String]) -> Almanac {
        let mut lines = lines.iter().map(String::as_str);
        let seeds: Vec<u64> = lines.next().and_then(|line| line.strip_prefix("seeds:"))
            .unwrap_or_else(|| panic!("expected a seeds line first"))
            .split_whitespace().map(|n| n.parse().expect(n)).collect();
        let mut maps: Vec<RangeMap> = vec![];
        for line in lines.filter(|line| !line.is_empty()) {
            if line.ends_with("map:") {
                maps.push(RangeMap::default());
                continue;
            }
            let [dest, src, len] = line.split_whitespace().map(|n|
                n.parse::<u64>().expect(n)
            ).collect::<Vec<_>>()[..] else {
                panic!("cannot parse range mapping {}", line)
            };
            maps.last_mut().unwrap_or_else(|| panic!("range mapping {} precedes any map header", line))
                .ranges.push(RangeMapping {dest, src, len});
        }
        Almanac {seeds, maps}
    }

    fn locate(&self, seed: u64) -> u64 {
        self.maps.iter().fold(seed, |value, map| map.apply(value))
    }

    fn inverse_chain(&self) -> Vec<RangeMap> {
        self.maps.iter().rev().map(RangeMap::inverse).collect()
    }

    fn seed_ranges(&self) -> Vec<Range<u64>> {
        self.seeds.iter().tuples().map(|(&start, &len)| start .. start + len).collect()
    }

    /// Walks locations upwards until one maps back into a seed range. Within a run where
    /// every inverse map shifts by a constant, the first hit can only be at the run start
    /// or at a seed range start, so everything in between is skipped.
    fn lowest_seeded_location(&self) -> Option<u64> {
        let inverse = self.inverse_chain();
        let seed_ranges = self.seed_ranges();
        let mut location = 0u64;
        loop {
            let (seed, run) = inverse.iter().fold((location, u64::MAX), |(value, run), map| {
                let (mapped, map_run) = map.apply_run(value);
                (mapped, run.min(map_run))
            });
            if seed_ranges.iter().any(|range| range.contains(&seed)) {return Some(location)}
            let skip = seed_ranges.iter()
                .filter(|range| range.start > seed)
                .map(|range| range.start - seed)
                .filter(|&gap| gap < run)
                .min().unwrap_or(run);
            log::trace!("location {} maps back to seed {}, skipping {}", location, seed, skip);
            location = location.checked_add(skip)?;
        }
    }
}

fn day5(part: u8, lines: &[String]) -> String {
    let almanac = Almanac::parse(lines);
    if part == 1 {
        almanac.seeds.iter().map(|&seed| almanac.locate(seed)).min()
            .expect("no seeds in almanac").to_string()
    } else {
        almanac.lowest_seeded_location()
            .unwrap_or_else(|| panic!("no location maps back into {:?}", almanac.seed_ranges()))
            .to_string()
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Copy, Debug)]
struct Race {time: u64, record: u64}

impl Race {
    fn distance(&self, hold: u64) -> u64 {hold * (self.time - hold)}

    // winning holds are symmetric around time / 2; the float root only seeds the search
    fn ways_to_win(&self) -> u64 {
        let half = self.time / 2;
        if self.distance(half) <= self.record {return 0}
        let (time, record) = (self.time as f64, self.record as f64);
        let root = (time * time - 4.0 * record).max(0.0).sqrt();
        let mut low = (((time - root) / 2.0).floor().max(0.0) as u64).min(half);
        while low > 0 && self.distance(low - 1) > self.record {low -= 1}
        while self.distance(low) <= self.record {low += 1}
        self.time - 2 * low + 1
    }
}

fn parse_races(part: u8, lines: &[String]) -> Vec<Race> {
    let [times, records, ..] = lines else {panic!("expected a time line and a distance line")};
    let numbers = |line: &str| -> Vec<u64> {
        let Some((_, values)) = line.split_once(':') else {panic!("cannot parse race line {}", line)};
        if part == 1 {
            values.split_whitespace().map(|n| n.parse().expect(n)).collect()
        } else {
            vec![values.split_whitespace().collect::<String>().parse().expect(values)]
        }
    };
    zip(numbers(times.as_str()), numbers(records.as_str())).map(|(time, record)| Race {time, record}).collect()
}

fn day6(part: u8, lines: &[String]) -> String {
    parse_races(part, lines).iter().map(Race::ways_to_win).product::<u64>().to_string()
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
enum ArgsError {
    #[error("no solution available for day {0}")]
    DayNotAvailable(usize),
    #[error("part must be 1 or 2, got {0}")]
    InvalidPart(String),
}

fn split_lines(input: &str) -> Vec<String> {
    input.trim_end().lines().map(|line| line.trim_end().to_owned()).collect()
}

fn read_lines(fname: &str) -> std::io::Result<Vec<String>> {
    Ok(split_lines(&std::fs::read_to_string(fname)?))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let days = [
      day1, day2, day3, day4, day5, day6
    ];

    let args = std::env::args().collect::<Vec<_>>();
    let (day_arg, part_arg, fname) = match &args[..] {
        [_, day_arg] => (day_arg, None, format!("day{}.in", day_arg)),
        [_, day_arg, part_arg] => (day_arg, Some(part_arg), format!("day{}.in", day_arg)),
        [_, day_arg, test_arg, part_arg] => (day_arg, Some(part_arg), format!("day{}test{}.in", day_arg, test_arg)),
        _ => {
            println!("one to three arguments expected - day number, optionally test number and 1/2 for part");
            std::process::exit(1);
        }
    };

    let day: usize = day_arg.parse()?;
    let solve = *days.get(day.wrapping_sub(1)).ok_or(ArgsError::DayNotAvailable(day))?;
    let parts: &[u8] = match part_arg.map(String::as_str) {
        None => &[1, 2],
        Some("1") => &[1],
        Some("2") => &[2],
        Some(other) => return Err(ArgsError::InvalidPart(other.to_owned()).into())
    };

    log::debug!("reading {}", fname);
    let lines = read_lines(&fname)?;
    for &part in parts {
        let time = std::time::Instant::now();
        println!("{}", solve(part, &lines));
        log::info!("day {} part {}: {} seconds elapsed", day, part, time.elapsed().as_secs_f32());
    }
    Ok(())
}
