#[cfg(test)]
mod tests {
    use crate::{Encoding, Entry, HistoryBuffer, PersistentHistoryStore, codec};
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use tempfile::TempDir;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 6, 1)
            .unwrap()
            .and_hms_milli_opt(9, 15, 30, 250)
            .unwrap()
    }

    #[test]
    fn test_capacity_three_end_to_end() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("history");

        let store = PersistentHistoryStore::new(&path, Encoding::Utf8, 3);
        for (i, cmd) in ["first", "second", "third", "fourth"].iter().enumerate() {
            store.append(Entry::with_timestamp(*cmd, start() + Duration::minutes(i as i64))?);
        }
        assert_eq!(store.buffer().commands(), vec!["fourth", "third", "second"]);
        store.save()?;

        let elsewhere = PersistentHistoryStore::new(&path, Encoding::Utf8, 3);
        elsewhere.load()?;
        assert_eq!(elsewhere.buffer().commands(), vec!["fourth", "third", "second"]);
        assert_eq!(elsewhere.list(), store.list());
        Ok(())
    }

    #[test]
    fn test_persistence_truncates_to_capacity() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("history");

        let store = PersistentHistoryStore::new(&path, Encoding::Utf8, 5);
        for i in 0..12 {
            let text = format!("printf '%s,%s' \"{i}\" x");
            store.append(Entry::with_timestamp(text, start() + Duration::seconds(i))?);
        }
        store.save()?;

        let content = std::fs::read_to_string(&path)?;
        assert_eq!(content.lines().count(), 5);

        let restored = PersistentHistoryStore::new(&path, Encoding::Utf8, 5);
        assert_eq!(restored.load()?, 5);
        assert_eq!(restored.list(), store.list());
        Ok(())
    }

    #[test]
    fn test_load_shrink_save_sequence() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("history");

        let store = PersistentHistoryStore::new(&path, Encoding::Utf8, 10);
        for day in 0..5 {
            store.append(Entry::with_timestamp(
                format!("day{day}"),
                start() + Duration::days(day),
            )?);
        }
        store.save()?;

        let next = PersistentHistoryStore::new(&path, Encoding::Utf8, 10);
        next.load()?;
        assert_eq!(next.shrink(start() + Duration::days(2)), 3);
        next.save()?;

        let last = PersistentHistoryStore::new(&path, Encoding::Utf8, 10);
        last.load()?;
        assert_eq!(last.buffer().commands(), vec!["day4", "day3"]);
        Ok(())
    }

    #[test]
    fn test_latin1_file_round_trip() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("history");

        let store = PersistentHistoryStore::new(&path, Encoding::Latin1, 4);
        store.append(Entry::with_timestamp("cd Téléchargements", start())?);
        store.save()?;

        let raw = std::fs::read(&path)?;
        assert!(raw.contains(&0xE9));
        assert!(String::from_utf8(raw).is_err());

        let restored = PersistentHistoryStore::new(&path, Encoding::Latin1, 4);
        restored.load()?;
        assert_eq!(restored.buffer().commands(), vec!["cd Téléchargements"]);
        Ok(())
    }

    #[test]
    fn test_entry_lines_survive_codec() {
        let tricky = [
            "echo \"hello, world\"",
            "  padded  ",
            "",
            "a\tb",
            "\"",
            ",",
        ];
        for text in tricky {
            let entry = Entry::with_timestamp(text, start()).unwrap();
            let line = entry.format();
            let fields = codec::decode(&line).unwrap();
            assert_eq!(fields.len(), 2);
            assert_eq!(fields[1], text);
            assert_eq!(Entry::parse(&line).unwrap(), entry);
        }
    }

    #[test]
    fn test_capacity_invariant_under_mixed_operations() {
        let buffer = HistoryBuffer::new(4);
        for i in 0..20 {
            let at = start() + Duration::seconds(i);
            buffer.append(Entry::with_timestamp(format!("{i}"), at).unwrap());
            if i % 7 == 0 {
                buffer.shrink(start() + Duration::seconds(i - 2));
            }
            assert!(buffer.len() <= buffer.capacity());
            let snapshot = buffer.list();
            assert!(
                snapshot
                    .windows(2)
                    .all(|pair| pair[0].timestamp() > pair[1].timestamp())
            );
        }
    }
}
