//! End-to-end export/import: domain objects through archivers, into a
//! compressed and encrypted snapshot, and back out to equivalent objects.

use bytes::Bytes;
use framevault_archive::{
    ArchiveContext, AttachmentDataSource, CallArchiver, CallRecord, CallRecordStatus, DataSource,
    FrameArchiver, MemoryStore, RestoreContext, SnapshotReader, SnapshotWriter, StickerArchiver,
    StickerMessage, StoreRead, STICKER_PACK_KEY_COLLECTION,
};
use framevault_core::{CallDirection, CallKind, ConversationId, Frame, RenderingFlag, StickerPackId};
use framevault_stream::stages::{AesGcmDecrypt, AesGcmEncrypt, Lz4Compress, Lz4Decompress};
use framevault_stream::{FileSink, FileSource, MemorySink, TransformPipeline};

const KEY: [u8; 32] = [0x2C; 32];
const STREAM_NONCE: [u8; 4] = [9, 8, 7, 6];

fn encode_pipeline() -> TransformPipeline {
    TransformPipeline::new(vec![
        Box::new(Lz4Compress::new()),
        Box::new(AesGcmEncrypt::new(&KEY, STREAM_NONCE)),
    ])
}

fn decode_pipeline() -> TransformPipeline {
    TransformPipeline::new(vec![
        Box::new(AesGcmDecrypt::new(&KEY)),
        Box::new(Lz4Decompress::new()),
    ])
}

fn sample_calls() -> Vec<CallRecord> {
    vec![
        CallRecord {
            call_id: 11,
            conversation_unique_id: "conversation-a".to_string(),
            kind: CallKind::Audio,
            direction: CallDirection::Incoming,
            status: CallRecordStatus::Accepted,
            started_at_ms: 1_700_000_001_000,
        },
        CallRecord {
            call_id: 22,
            conversation_unique_id: "conversation-b".to_string(),
            kind: CallKind::Video,
            direction: CallDirection::Outgoing,
            status: CallRecordStatus::Missed,
            started_at_ms: 1_700_000_002_000,
        },
    ]
}

fn sample_sticker() -> StickerMessage {
    let source = AttachmentDataSource::new(
        "image/webp",
        Some("celebration".to_string()),
        RenderingFlag::Default,
        DataSource::Memory {
            data: Bytes::from(vec![0xABu8; 2048]),
            filename: Some("sticker_7.webp".to_string()),
        },
    );
    StickerMessage::from_data_source(
        StickerPackId([0x33; 16]),
        [0x44; 32],
        7,
        Some("🎉".to_string()),
        &source,
    )
}

fn export(calls: &[CallRecord], sticker: &StickerMessage) -> Bytes {
    let mut store = MemoryStore::new();
    let mut ctx = ArchiveContext::new(&mut store);
    ctx.assign_conversation_id("conversation-a");
    ctx.assign_conversation_id("conversation-b");

    let call_archiver = CallArchiver::new();
    let sticker_archiver = StickerArchiver::new();

    let mut writer = SnapshotWriter::new(MemorySink::new(), encode_pipeline()).unwrap();
    for call in calls {
        let frame = call_archiver.archive(call, &mut ctx).unwrap();
        writer.write_frame(&frame).unwrap();
    }
    let frame = sticker_archiver.archive(sticker, &mut ctx).unwrap();
    writer.write_frame(&frame).unwrap();

    let (sink, info) = writer.finish().unwrap();
    assert_eq!(info.frame_count, calls.len() as u32 + 1);
    sink.into_bytes()
}

#[test]
fn test_full_export_import_roundtrip() {
    let calls = sample_calls();
    let sticker = sample_sticker();
    let wire = export(&calls, &sticker);

    let (frames, info) = SnapshotReader::parse(&wire, decode_pipeline()).unwrap();
    assert_eq!(info.frame_count, 3);

    let mut store = MemoryStore::new();
    let mut ctx = RestoreContext::new(&mut store);
    ctx.register_conversation(ConversationId(0), "conversation-a".to_string());
    ctx.register_conversation(ConversationId(1), "conversation-b".to_string());

    let call_archiver = CallArchiver::new();
    let sticker_archiver = StickerArchiver::new();

    let mut restored_calls = Vec::new();
    let mut restored_stickers = Vec::new();
    for frame in &frames {
        match frame {
            Frame::Call(_) => restored_calls.push(call_archiver.restore(frame, &mut ctx).unwrap()),
            Frame::Sticker(_) => {
                restored_stickers.push(sticker_archiver.restore(frame, &mut ctx).unwrap())
            }
        }
    }

    assert_eq!(restored_calls, calls);
    assert_eq!(restored_stickers, vec![sticker]);

    // Restoring the sticker re-registered its pack key
    let stored = store
        .get(STICKER_PACK_KEY_COLLECTION, &hex::encode([0x33u8; 16]))
        .unwrap();
    assert_eq!(stored.as_ref(), &[0x44u8; 32]);
}

#[test]
fn test_snapshot_body_is_opaque_on_the_wire() {
    let calls = sample_calls();
    let wire = export(&calls, &sample_sticker());

    // Plaintext markers from the frames must not survive encryption
    let needle = b"image/webp";
    assert!(!wire
        .windows(needle.len())
        .any(|w| w == needle));
}

#[test]
fn test_wrong_key_fails_cleanly() {
    let wire = export(&sample_calls(), &sample_sticker());

    let wrong_key = [0xEE; 32];
    let pipeline = TransformPipeline::new(vec![
        Box::new(AesGcmDecrypt::new(&wrong_key)),
        Box::new(Lz4Decompress::new()),
    ]);
    assert!(SnapshotReader::parse(&wire, pipeline).is_err());
}

#[test]
fn test_file_backed_snapshot_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("backup.fvlt");

    let calls = sample_calls();
    let sticker = sample_sticker();

    let mut store = MemoryStore::new();
    let mut ctx = ArchiveContext::new(&mut store);
    ctx.assign_conversation_id("conversation-a");
    ctx.assign_conversation_id("conversation-b");

    let call_archiver = CallArchiver::new();
    let mut writer =
        SnapshotWriter::new(FileSink::create(&path).unwrap(), encode_pipeline()).unwrap();
    for call in &calls {
        let frame = call_archiver.archive(call, &mut ctx).unwrap();
        writer.write_frame(&frame).unwrap();
    }
    let frame = StickerArchiver::new().archive(&sticker, &mut ctx).unwrap();
    writer.write_frame(&frame).unwrap();
    writer.finish().unwrap();

    let mut source = FileSource::open(&path).unwrap();
    let (frames, info) = SnapshotReader::read(&mut source, decode_pipeline()).unwrap();
    assert_eq!(info.frame_count, 3);
    assert_eq!(frames.len(), 3);
}
