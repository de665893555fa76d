use chrono::{DateTime, TimeZone};

use crate::Cron;

/// Iterator over the occurrences of a schedule, in ascending order.
///
/// Created by [`Cron::iter_after`]. Every item is strictly later than the one
/// before it, and the iterator ends once the schedule has no further
/// occurrence. Cloning it restarts from the current position.
#[derive(Debug, Clone)]
pub struct CronIterator<Tz>
where
    Tz: TimeZone,
{
    cron: Cron,
    current_time: DateTime<Tz>,
    exhausted: bool,
}

impl<Tz> CronIterator<Tz>
where
    Tz: TimeZone,
{
    /// Creates a new `CronIterator` yielding occurrences after `start_after`.
    pub fn new(cron: Cron, start_after: DateTime<Tz>) -> Self {
        CronIterator {
            cron,
            current_time: start_after,
            exhausted: false,
        }
    }
}

impl<Tz> Iterator for CronIterator<Tz>
where
    Tz: TimeZone,
{
    type Item = DateTime<Tz>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        match self.cron.next(&self.current_time) {
            Some(found) => {
                self.current_time = found.clone();
                Some(found)
            }
            None => {
                self.exhausted = true;
                None
            }
        }
    }
}

impl<Tz> std::iter::FusedIterator for CronIterator<Tz> where Tz: TimeZone {}
