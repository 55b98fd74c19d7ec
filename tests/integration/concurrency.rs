//! Integration Tests: Concurrent Emission
//!
//! Records from one logger are serialized; records from loggers sharing a
//! context may interleave, but only as whole lines.

#[cfg(test)]
mod tests {
    use super::super::tests::memory_logger;
    use logcore::logging::{Context, Level, MemorySink};
    use std::sync::Arc;

    const THREADS: usize = 8;
    const PER_THREAD: usize = 200;

    fn assert_whole_records(sink: &MemorySink, expected: usize) {
        let chunks = sink.lines();
        assert_eq!(chunks.len(), expected);
        for chunk in &chunks {
            assert!(chunk.ends_with('\n'), "partial record: {:?}", chunk);
            assert_eq!(chunk.matches('\n').count(), 1, "merged records: {:?}", chunk);
        }
    }

    #[test]
    fn test_one_logger_many_threads() {
        let (logger, sink) = memory_logger("{{.Level}} {{.Message}}", Level::Info);
        let logger = Arc::new(logger);

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let logger = Arc::clone(&logger);
                std::thread::spawn(move || {
                    for i in 0..PER_THREAD {
                        logger.info(format_args!("thread {} record {}", t, i)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_whole_records(&sink, THREADS * PER_THREAD);
    }

    #[test]
    fn test_per_thread_order_is_preserved() {
        let (logger, sink) = memory_logger("{{.Message}}", Level::Info);
        let logger = Arc::new(logger);

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let logger = Arc::clone(&logger);
                std::thread::spawn(move || {
                    for i in 0..PER_THREAD {
                        logger.info(format_args!("{} {}", t, i)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut next = vec![0usize; THREADS];
        for line in sink.lines() {
            let mut parts = line.split_whitespace();
            let t: usize = parts.next().unwrap().parse().unwrap();
            let i: usize = parts.next().unwrap().parse().unwrap();
            assert_eq!(i, next[t]);
            next[t] += 1;
        }
        assert!(next.iter().all(|&n| n == PER_THREAD));
    }

    #[test]
    fn test_many_loggers_one_context() {
        let sink = MemorySink::new();
        let ctx = Arc::new(
            Context::new(Box::new(sink.clone()), "{{.Message}}", Level::Info).unwrap(),
        );

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let logger = ctx.get_logger(&format!("worker.{}", t), Level::Default);
                let ctx = Arc::clone(&ctx);
                std::thread::spawn(move || {
                    for i in 0..PER_THREAD {
                        // Threshold flips under the writers' feet; Info always passes.
                        ctx.set_level(if i % 2 == 0 { Level::Info } else { Level::Trace });
                        logger.info(format_args!("worker {} record {}", t, i)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_whole_records(&sink, THREADS * PER_THREAD);
    }
}
