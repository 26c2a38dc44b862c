#![forbid(unsafe_code)]

use super::lift::{Step, lift};
use crate::constructors::empty;
use crate::source::Source;

impl<T: 'static> Source<T> {
    /// Emit at most `n` values, then complete and cancel upstream.
    ///
    /// `take(0)` completes without subscribing upstream.
    #[must_use]
    pub fn take(self, n: usize) -> Source<T> {
        if n == 0 {
            return empty();
        }
        lift(self, move || {
            let mut seen = 0usize;
            move |value: T| {
                seen += 1;
                if seen >= n {
                    Step::Last(value)
                } else {
                    Step::Emit(value)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::constructors::from_array;
    use crate::subject::Subject;
    use crate::testing::{Recorded, Recorder};

    #[test]
    fn takes_prefix_and_completes() {
        let rec = Recorder::attach(&from_array(vec![1, 2, 3, 4]).take(2));
        assert_eq!(
            rec.events(),
            vec![Recorded::Data(1), Recorded::Data(2), Recorded::End]
        );
    }

    #[test]
    fn unsubscribes_from_hot_source() {
        let subject = Subject::new();
        let rec = Recorder::attach(&subject.source().take(1));
        subject.next('a');
        subject.next('b');
        assert_eq!(rec.events(), vec![Recorded::Data('a'), Recorded::End]);
        assert_eq!(subject.subscriber_count(), 0);
    }

    #[test]
    fn take_zero_is_empty() {
        let subject = Subject::<u8>::new();
        let rec = Recorder::attach(&subject.source().take(0));
        assert_eq!(rec.events(), vec![Recorded::End]);
        assert_eq!(subject.subscriber_count(), 0);
    }

    #[test]
    fn shorter_source_completes_normally() {
        let rec = Recorder::attach(&from_array(vec![1]).take(5));
        assert_eq!(rec.events(), vec![Recorded::Data(1), Recorded::End]);
    }
}
